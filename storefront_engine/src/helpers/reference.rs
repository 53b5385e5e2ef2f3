use rand::Rng;

use crate::db_types::OrderReference;

/// How many times order creation will re-roll the reference on a uniqueness collision before giving up.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// Generate a candidate order reference: 6 bytes from the thread-local CSPRNG, rendered as 12 uppercase hex
/// characters. Collisions are vanishingly rare but not impossible; the caller must be prepared to retry when the
/// database's uniqueness constraint fires.
pub fn new_order_reference() -> OrderReference {
    let bytes = rand::thread_rng().gen::<[u8; 6]>();
    OrderReference(bytes.iter().map(|b| format!("{b:02X}")).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn references_are_twelve_uppercase_hex_chars() {
        for _ in 0..100 {
            let reference = new_order_reference();
            assert_eq!(reference.as_str().len(), 12);
            assert!(reference.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn references_do_not_obviously_repeat() {
        let refs: std::collections::HashSet<_> = (0..1000).map(|_| new_order_reference().0).collect();
        assert_eq!(refs.len(), 1000);
    }
}
