//! Filter hashes and chained filter headers (BIP 157)
//!
//! ```text
//! filter_hash = SHA256d(compact_size(N) || data)
//! header      = SHA256d(filter_hash || prev_header)
//! ```
//!
//! Each header commits to every earlier filter, so a client holding a trusted
//! header can check a whole run of filters against it.

use sha2::{Digest, Sha256};

use super::gcs_filter::GcsFilter;
use crate::error::FilterError;

/// 32-byte hash (block hash, filter hash or filter header)
pub type Hash = [u8; 32];

/// Previous header used for the first filter in a chain
pub const ZERO_HASH: Hash = [0u8; 32];

/// SHA-256 applied twice
pub fn double_sha256(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Header committing to `filter_hash` on top of `prev_header`
pub fn filter_header(filter_hash: &Hash, prev_header: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(filter_hash);
    hasher.update(prev_header);
    let first = hasher.finalize();
    Sha256::digest(first).into()
}

impl GcsFilter {
    /// Content hash over the `compact_size(N) || data` layout
    pub fn hash(&self) -> Hash {
        double_sha256(&self.to_n_bytes())
    }

    /// This filter's header given the previous filter header
    pub fn header(&self, prev_header: &Hash) -> Hash {
        filter_header(&self.hash(), prev_header)
    }
}

/// Running chain of filter headers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterHeaderChain {
    tip: Hash,
    height: u64,
}

impl FilterHeaderChain {
    /// Start a chain whose first filter links to `prev_header`
    pub fn new(prev_header: Hash) -> Self {
        Self {
            tip: prev_header,
            height: 0,
        }
    }

    /// Extend the chain with the next filter hash, returning its header
    pub fn push(&mut self, filter_hash: &Hash) -> Hash {
        self.tip = filter_header(filter_hash, &self.tip);
        self.height += 1;
        self.tip
    }

    /// Extend the chain with a filter, returning its header
    pub fn push_filter(&mut self, filter: &GcsFilter) -> Hash {
        self.push(&filter.hash())
    }

    /// Latest header (the starting previous header if nothing was pushed)
    pub fn tip(&self) -> Hash {
        self.tip
    }

    /// Number of filters pushed
    pub fn height(&self) -> u64 {
        self.height
    }
}

/// Headers for consecutive `filter_hashes` starting from `prev_header`
pub fn chain_headers(prev_header: &Hash, filter_hashes: &[Hash]) -> Vec<Hash> {
    let mut chain = FilterHeaderChain::new(*prev_header);
    filter_hashes.iter().map(|hash| chain.push(hash)).collect()
}

/// Check a claimed run of headers against the filter hashes they commit to.
///
/// Reports the index of the first header that does not match.
pub fn verify_header_chain(
    prev_header: &Hash,
    filter_hashes: &[Hash],
    headers: &[Hash],
) -> Result<(), FilterError> {
    if filter_hashes.len() != headers.len() {
        return Err(FilterError::HeaderCountMismatch {
            headers: headers.len(),
            filters: filter_hashes.len(),
        });
    }

    let mut prev = *prev_header;
    for (index, (filter_hash, claimed)) in filter_hashes.iter().zip(headers).enumerate() {
        let expected = filter_header(filter_hash, &prev);
        if &expected != claimed {
            return Err(FilterError::HeaderMismatch { index });
        }
        prev = expected;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gcs_filter::GOLOMB_P;

    const KEY: [u8; 16] = [0x11; 16];

    fn filter(items: &[&[u8]]) -> GcsFilter {
        GcsFilter::build(GOLOMB_P, &KEY, items).unwrap()
    }

    #[test]
    fn test_double_sha256_known_vector() {
        assert_eq!(
            hex::encode(double_sha256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_filter_header_is_hash_of_concatenation() {
        let filter_hash = [0x01; 32];
        let prev = [0x02; 32];
        let mut joined = Vec::new();
        joined.extend_from_slice(&filter_hash);
        joined.extend_from_slice(&prev);

        assert_eq!(filter_header(&filter_hash, &prev), double_sha256(&joined));
    }

    #[test]
    fn test_filter_hash_covers_serialized_form() {
        let f = filter(&[b"a", b"b"]);
        assert_eq!(f.hash(), double_sha256(&f.to_n_bytes()));
    }

    #[test]
    fn test_header_is_deterministic() {
        let f = filter(&[b"a", b"b", b"c"]);
        assert_eq!(f.header(&ZERO_HASH), f.header(&ZERO_HASH));
    }

    #[test]
    fn test_header_changes_with_content_and_prev() {
        let f = filter(&[b"a", b"b", b"c"]);
        let g = filter(&[b"a", b"b", b"d"]);

        assert_ne!(f.header(&ZERO_HASH), g.header(&ZERO_HASH));
        assert_ne!(f.header(&ZERO_HASH), f.header(&[0x01; 32]));
    }

    #[test]
    fn test_chain_links_headers() {
        let filters = [filter(&[b"one"]), filter(&[b"two"]), filter(&[b"three"])];
        let hashes: Vec<Hash> = filters.iter().map(GcsFilter::hash).collect();

        let headers = chain_headers(&ZERO_HASH, &hashes);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0], filters[0].header(&ZERO_HASH));
        assert_eq!(headers[1], filters[1].header(&headers[0]));
        assert_eq!(headers[2], filters[2].header(&headers[1]));

        let mut chain = FilterHeaderChain::new(ZERO_HASH);
        for f in &filters {
            chain.push_filter(f);
        }
        assert_eq!(chain.tip(), headers[2]);
        assert_eq!(chain.height(), 3);
    }

    #[test]
    fn test_verify_header_chain() {
        let hashes = [[0xA1; 32], [0xB2; 32], [0xC3; 32]];
        let mut headers = chain_headers(&ZERO_HASH, &hashes);

        assert!(verify_header_chain(&ZERO_HASH, &hashes, &headers).is_ok());

        headers[1][0] ^= 0xFF;
        assert_eq!(
            verify_header_chain(&ZERO_HASH, &hashes, &headers),
            Err(FilterError::HeaderMismatch { index: 1 })
        );

        assert_eq!(
            verify_header_chain(&ZERO_HASH, &hashes, &headers[..2]),
            Err(FilterError::HeaderCountMismatch {
                headers: 2,
                filters: 3
            })
        );
    }

    #[test]
    fn test_empty_chain_keeps_prev_as_tip() {
        let chain = FilterHeaderChain::new([0x07; 32]);
        assert_eq!(chain.tip(), [0x07; 32]);
        assert!(chain_headers(&ZERO_HASH, &[]).is_empty());
    }
}
