use super::*;

#[test]
fn fnv_is_seed_and_input_sensitive() {
    let hash = |seed: u64, s: &str| {
        let mut h = Fnv1a64::new(seed);
        h.write_bytes(s.as_bytes());
        h.finish()
    };
    assert_eq!(hash(0, "viewer"), hash(0, "viewer"));
    assert_ne!(hash(0, "viewer"), hash(1, "viewer"));
    assert_ne!(hash(0, "viewer"), hash(0, "viewer2"));
}

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(200, 0), 0);
}
