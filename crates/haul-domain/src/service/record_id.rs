//! Identifiers for trips created on this client

use chrono::Utc;
use rand::Rng;

/// `PREFIX-NNNN-TTTT`: four random digits, then the last four digits of the
/// millisecond timestamp
pub fn generate_record_id<R: Rng + ?Sized>(prefix: &str, now_millis: i64, rng: &mut R) -> String {
    let random: u32 = rng.gen_range(1000..9999);
    format!("{}-{}-{:04}", prefix, random, now_millis.rem_euclid(10_000))
}

pub fn new_record_id(prefix: &str) -> String {
    generate_record_id(prefix, Utc::now().timestamp_millis(), &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_record_id("TR", 1_717_171_700_042, &mut rng);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TR");
        let random: u32 = parts[1].parse().unwrap();
        assert!((1000..=9998).contains(&random));
        assert_eq!(parts[2], "0042");
    }

    #[test]
    fn test_prefix_is_kept() {
        assert!(new_record_id("SOY").starts_with("SOY-"));
    }
}
