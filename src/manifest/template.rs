//! Line templates for batch-mode manifests
//!
//! A template turns one source path into one `cp` command. The builder asks
//! for a fresh line per file, so a randomized template can send consecutive
//! files to different destinations.

use crate::random::RandomSource;
use crate::types::DestinationPair;

/// One rendered manifest line together with the bucket it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub command: String,
    pub bucket: String,
}

/// Strategy producing one copy command per source file
pub trait LineTemplate {
    /// Render the command for `file_path` (already in forward-slash form)
    fn render_line(&self, file_path: &str, rng: &mut dyn RandomSource) -> RenderedLine;
}

/// Remote directory URI for a bucket and an object prefix
pub fn remote_uri(bucket: &str, prefix: &str) -> String {
    let bucket = bucket.trim_end_matches('/');
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/", bucket)
    } else {
        format!("{}/{}/", bucket, prefix)
    }
}

/// Every line targets the same bucket and prefix
#[derive(Debug, Clone)]
pub struct FixedDestination {
    bucket: String,
    prefix: String,
}

impl FixedDestination {
    pub fn new<B: Into<String>, P: Into<String>>(bucket: B, prefix: P) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

impl LineTemplate for FixedDestination {
    fn render_line(&self, file_path: &str, _rng: &mut dyn RandomSource) -> RenderedLine {
        RenderedLine {
            command: format!("cp {} {}", file_path, remote_uri(&self.bucket, &self.prefix)),
            bucket: self.bucket.clone(),
        }
    }
}

/// Each line draws one bucket/region pair uniformly and is region-qualified
#[derive(Debug, Clone)]
pub struct RandomPairedDestination {
    pairs: Vec<DestinationPair>,
    prefix: String,
}

impl RandomPairedDestination {
    /// `pairs` must not be empty; configuration validation guarantees it.
    pub fn new<P: Into<String>>(pairs: Vec<DestinationPair>, prefix: P) -> Self {
        debug_assert!(!pairs.is_empty(), "at least one destination pair is required");
        Self {
            pairs,
            prefix: prefix.into(),
        }
    }

    pub fn pairs(&self) -> &[DestinationPair] {
        &self.pairs
    }
}

impl LineTemplate for RandomPairedDestination {
    fn render_line(&self, file_path: &str, rng: &mut dyn RandomSource) -> RenderedLine {
        let pair = &self.pairs[rng.pick(self.pairs.len())];
        RenderedLine {
            command: format!(
                "cp --region={} {} {}",
                pair.region,
                file_path,
                remote_uri(&pair.bucket, &self.prefix)
            ),
            bucket: pair.bucket.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use proptest::prelude::*;

    fn two_pairs() -> Vec<DestinationPair> {
        vec![
            DestinationPair::new("s3://bucket-one", "us-east-1"),
            DestinationPair::new("s3://bucket-two", "us-east-2"),
        ]
    }

    #[test]
    fn test_remote_uri_normalizes_slashes() {
        assert_eq!(remote_uri("s3://b", "run/tok"), "s3://b/run/tok/");
        assert_eq!(remote_uri("s3://b/", "/run/tok/"), "s3://b/run/tok/");
        assert_eq!(remote_uri("s3://b", ""), "s3://b/");
    }

    #[test]
    fn test_fixed_destination_line() {
        let template = FixedDestination::new("s3://bucket-one", "abc/def");
        let mut rng = SeededRandom::from_seed(0);
        let line = template.render_line("blob/a.bin", &mut rng);
        assert_eq!(line.command, "cp blob/a.bin s3://bucket-one/abc/def/");
        assert_eq!(line.bucket, "s3://bucket-one");
    }

    #[test]
    fn test_random_paired_uses_both_pairs() {
        let template = RandomPairedDestination::new(two_pairs(), "p");
        let mut rng = SeededRandom::from_seed(3);
        let buckets: std::collections::HashSet<String> = (0..200)
            .map(|_| template.render_line("f", &mut rng).bucket)
            .collect();
        assert_eq!(buckets.len(), 2);
    }

    proptest! {
        #[test]
        fn region_always_matches_its_bucket(seed in any::<u64>()) {
            let template = RandomPairedDestination::new(two_pairs(), "run/token");
            let mut rng = SeededRandom::from_seed(seed);
            for i in 0..32 {
                let path = format!("blob/file{}.bin", i);
                let line = template.render_line(&path, &mut rng);
                let fields: Vec<&str> = line.command.split_whitespace().collect();
                prop_assert_eq!(fields.len(), 4);
                prop_assert_eq!(fields[0], "cp");
                prop_assert_eq!(fields[2], path.as_str());
                let region = fields[1].trim_start_matches("--region=");
                let pair = template
                    .pairs()
                    .iter()
                    .find(|p| p.region == region)
                    .expect("region comes from a configured pair");
                let bucket_root = format!("{}/", pair.bucket);
                prop_assert!(fields[3].starts_with(&bucket_root));
                prop_assert_eq!(&line.bucket, &pair.bucket);
            }
        }
    }
}
