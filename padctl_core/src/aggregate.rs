use padctl_traits::{ControllerSnapshot, DigitalSnapshot};

/// Combine one tick's digital bitfield and analog candidates.
pub fn aggregate(digital: DigitalSnapshot, analog: &[i32]) -> ControllerSnapshot {
    ControllerSnapshot::new(digital, analog.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_bits() {
        let d = DigitalSnapshot::from_bits(0b101, 3);
        let s = aggregate(d, &[5, 6, 7]);
        assert_eq!(s.digital(), d);
        assert_eq!(s.analog(), &[5, 6, 7]);
        assert!(s.is_seeded(0));
    }
}
