//! GCS Filter Service
//!
//! Orchestrates domain logic: validates the active configuration, builds and
//! queries filters, and reports every operation to a metrics recorder.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::domain::{BlockFilter, FilterConfig, FilterKey, GcsFilter, Hash};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{BlockView, CoinView, GcsFilterApi};

/// GCS Filter Service implementation
///
/// Implements the `GcsFilterApi` port.
pub struct GcsFilterService<M: MetricsRecorder = NoOpMetrics> {
    /// Active configuration, validated on construction
    config: FilterConfig,
    /// Metrics sink
    metrics: Arc<M>,
}

impl GcsFilterService<NoOpMetrics> {
    /// Create a service with the default configuration and no metrics
    pub fn new() -> Self {
        Self {
            config: FilterConfig::default(),
            metrics: Arc::new(NoOpMetrics),
        }
    }
}

impl Default for GcsFilterService<NoOpMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetricsRecorder> GcsFilterService<M> {
    /// Create with a custom configuration and metrics recorder
    pub fn with_config(config: FilterConfig, metrics: Arc<M>) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self { config, metrics })
    }

    /// Metrics recorder shared with this service
    pub fn metrics(&self) -> &Arc<M> {
        &self.metrics
    }

    fn record_built(&self, filter: &GcsFilter, started: Instant) {
        self.metrics
            .record_filter_built(filter.n(), filter.size_bytes(), started.elapsed());
    }

    fn record_block_filter(&self, filter: &BlockFilter, started: Instant) {
        self.record_built(&filter.filter, started);
        debug!(
            block = %hex::encode(filter.block_hash),
            filter_type = ?filter.filter_type,
            items = filter.filter.n(),
            bytes = filter.filter.size_bytes(),
            "Built block filter"
        );
    }
}

impl<M: MetricsRecorder> GcsFilterApi for GcsFilterService<M> {
    fn config(&self) -> &FilterConfig {
        &self.config
    }

    fn build_filter(&self, p: u8, key: &[u8], items: &[&[u8]]) -> Result<GcsFilter, FilterError> {
        let started = Instant::now();
        let key = FilterKey::try_from(key)?;
        let filter = GcsFilter::build_with_limit(p, &key, items, self.config.max_items)?;
        self.record_built(&filter, started);
        Ok(filter)
    }

    fn build_basic_filter<B, V>(&self, block: &B, view: &V) -> Result<BlockFilter, FilterError>
    where
        B: BlockView,
        V: CoinView,
    {
        let started = Instant::now();
        let filter = BlockFilter::basic(block, view, &self.config)?;
        self.record_block_filter(&filter, started);
        Ok(filter)
    }

    fn build_extended_filter<B>(&self, block: &B) -> Result<BlockFilter, FilterError>
    where
        B: BlockView,
    {
        let started = Instant::now();
        let filter = BlockFilter::extended(block, &self.config)?;
        self.record_block_filter(&filter, started);
        Ok(filter)
    }

    fn contains(&self, filter: &GcsFilter, key: &[u8], target: &[u8]) -> Result<bool, FilterError> {
        let started = Instant::now();
        let found = filter.contains(key, target)?;
        self.metrics.record_query(1, started.elapsed(), found);
        trace!(n = filter.n(), found, "Single filter query");
        Ok(found)
    }

    fn match_any(
        &self,
        filter: &GcsFilter,
        key: &[u8],
        targets: &[&[u8]],
    ) -> Result<bool, FilterError> {
        let started = Instant::now();
        let found = filter.match_any(key, targets)?;
        self.metrics
            .record_query(targets.len(), started.elapsed(), found);
        trace!(
            n = filter.n(),
            targets = targets.len(),
            found,
            "Batch filter query"
        );
        Ok(found)
    }

    fn filter_header(&self, filter: &GcsFilter, prev_header: Option<&Hash>) -> Hash {
        let prev = prev_header.unwrap_or(&self.config.genesis_header);
        filter.header(prev)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::adapters::{MemoryBlock, MemoryInput, MemoryOutput, MemoryTransaction};
    use crate::domain::{FilterType, GOLOMB_P, ZERO_HASH};
    use crate::metrics::Metrics;
    use crate::ports::OutPoint;

    const KEY: [u8; 16] = [0x5A; 16];

    fn metered_service() -> GcsFilterService<Metrics> {
        GcsFilterService::with_config(FilterConfig::default(), Arc::new(Metrics::new())).unwrap()
    }

    fn block_with_spend() -> (MemoryBlock, HashMap<OutPoint, Vec<u8>>) {
        let spent = OutPoint::new([0x01; 32], 3);
        let block = MemoryBlock::new(
            [0xEE; 32],
            vec![
                MemoryTransaction::coinbase(vec![MemoryOutput::new(b"coinbase_out".to_vec())]),
                MemoryTransaction::new(
                    vec![MemoryInput::spending(spent).with_witness(vec![b"witness".to_vec()])],
                    vec![MemoryOutput::new(b"payment".to_vec())],
                ),
            ],
        );
        let mut coins = HashMap::new();
        coins.insert(spent, b"previous_script".to_vec());
        (block, coins)
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let config = FilterConfig::default().with_precision(40);
        let result = GcsFilterService::with_config(config, Arc::new(NoOpMetrics));
        assert!(matches!(result, Err(FilterError::InvalidPrecision { p: 40 })));
    }

    #[test]
    fn test_build_and_query_records_metrics() {
        let service = metered_service();
        let items: [&[u8]; 3] = [b"a", b"b", b"c"];

        let filter = service.build_filter(GOLOMB_P, &KEY, &items).unwrap();
        assert!(service.contains(&filter, &KEY, b"a").unwrap());
        assert!(!service.contains(&filter, &KEY, b"zzz").unwrap());

        let targets: [&[u8]; 2] = [b"zzz", b"c"];
        assert!(service.match_any(&filter, &KEY, &targets).unwrap());

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.filters_built, 1);
        assert_eq!(snapshot.items_encoded, 3);
        assert_eq!(snapshot.queries_performed, 3);
        assert_eq!(snapshot.queries_positive, 2);
        assert_eq!(snapshot.targets_queried, 4);
    }

    #[test]
    fn test_build_filter_respects_max_items() {
        let config = FilterConfig::default().with_max_items(2);
        let service = GcsFilterService::with_config(config, Arc::new(Metrics::new())).unwrap();
        let items: [&[u8]; 3] = [b"a", b"b", b"c"];

        let result = service.build_filter(GOLOMB_P, &KEY, &items);
        assert_eq!(result, Err(FilterError::TooManyItems { count: 3, max: 2 }));
        assert_eq!(service.metrics().snapshot().filters_built, 0);
    }

    #[test]
    fn test_oversized_build_fails_fast() {
        // Encoding this many items at p = 0 would not finish in a test run
        let config = FilterConfig::default().with_max_items(5);
        let service = GcsFilterService::with_config(config, Arc::new(Metrics::new())).unwrap();
        let owned: Vec<Vec<u8>> = (0..50_000u32).map(|i| i.to_be_bytes().to_vec()).collect();
        let items: Vec<&[u8]> = owned.iter().map(Vec::as_slice).collect();

        let result = service.build_filter(0, &KEY, &items);
        assert_eq!(
            result,
            Err(FilterError::TooManyItems {
                count: 50_000,
                max: 5
            })
        );
        assert_eq!(service.metrics().snapshot().filters_built, 0);
    }

    #[test]
    fn test_failed_query_is_not_recorded() {
        let service = metered_service();
        let items: [&[u8]; 1] = [b"a"];
        let filter = service.build_filter(GOLOMB_P, &KEY, &items).unwrap();

        assert_eq!(
            service.match_any(&filter, &KEY, &[]),
            Err(FilterError::EmptyTargetSet)
        );
        assert!(service.contains(&filter, &KEY[..4], b"a").is_err());
        assert_eq!(service.metrics().snapshot().queries_performed, 0);
    }

    #[test]
    fn test_build_block_filters() {
        let service = metered_service();
        let (block, coins) = block_with_spend();

        let basic = service.build_basic_filter(&block, &coins).unwrap();
        assert_eq!(basic.filter_type, FilterType::Basic);
        assert_eq!(basic.filter.n(), 3);
        assert!(basic.might_contain(b"previous_script"));

        let extended = service.build_extended_filter(&block).unwrap();
        assert_eq!(extended.filter_type, FilterType::Extended);
        assert_eq!(extended.filter.n(), 1);
        assert!(extended.might_contain(b"witness"));

        assert_eq!(service.metrics().snapshot().filters_built, 2);
    }

    #[test]
    fn test_filter_header_uses_genesis_by_default() {
        let genesis = [0x33; 32];
        let config = FilterConfig::default().with_genesis_header(genesis);
        let service = GcsFilterService::with_config(config, Arc::new(NoOpMetrics)).unwrap();
        let items: [&[u8]; 1] = [b"a"];
        let filter = service.build_filter(GOLOMB_P, &KEY, &items).unwrap();

        assert_eq!(service.filter_header(&filter, None), filter.header(&genesis));
        assert_eq!(
            service.filter_header(&filter, Some(&ZERO_HASH)),
            filter.header(&ZERO_HASH)
        );
    }

    #[test]
    fn test_default_service() {
        let service = GcsFilterService::new();
        assert_eq!(service.config(), &FilterConfig::default());
    }
}
