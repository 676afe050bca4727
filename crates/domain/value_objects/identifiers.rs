use rand::Rng;

/// Length of client-generated row identifiers.
pub const ID_LENGTH: usize = 22;
pub const EMAIL_LOCAL_PART_LENGTH: usize = 10;
pub const SAMPLE_EMAIL_DOMAIN: &str = "example.com";

pub fn random_lowercase<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| rng.gen_range('a'..='z')).collect()
}

/// Fresh row identifier. There is no collision check; uniqueness is only probable.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_lowercase(rng, ID_LENGTH)
}

pub fn random_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}@{}",
        random_lowercase(rng, EMAIL_LOCAL_PART_LENGTH),
        SAMPLE_EMAIL_DOMAIN
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn ids_are_fixed_length_lowercase() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let id = random_id(&mut rng);
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn ids_are_unique_within_a_run_in_practice() {
        let mut rng = rand::thread_rng();
        let ids: HashSet<String> = (0..1_000).map(|_| random_id(&mut rng)).collect();

        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn emails_use_random_local_part() {
        let mut rng = StdRng::seed_from_u64(11);
        let email = random_email(&mut rng);
        let (local, domain) = email.split_once('@').unwrap();

        assert_eq!(local.len(), EMAIL_LOCAL_PART_LENGTH);
        assert!(local.chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(domain, SAMPLE_EMAIL_DOMAIN);
    }
}
