use proptest::prelude::*;

use mqpow_types::bits::{get_bit, set_bit, shift_left_one, shift_right_one, write_bits};
use mqpow_types::{BitVec, Nbit};

proptest! {
    /// A written range reads back exactly and leaves the rest of the buffer alone.
    #[test]
    fn write_bits_touches_only_its_range(
        dst in prop::collection::vec(any::<u8>(), 1..8),
        src in prop::collection::vec(any::<u8>(), 1..4),
        offset in 0usize..64,
        len in 0usize..32,
    ) {
        let mut out = dst.clone();
        let ok = write_bits(&mut out, offset, &src, len);
        let fits = offset + len <= dst.len() * 8 && len <= src.len() * 8;
        prop_assert_eq!(ok, fits);
        if !ok {
            prop_assert_eq!(&out, &dst);
        } else {
            for i in 0..dst.len() * 8 {
                let expected = if i >= offset && i < offset + len {
                    get_bit(&src, i - offset)
                } else {
                    get_bit(&dst, i)
                };
                prop_assert_eq!(get_bit(&out, i), expected);
            }
        }
    }

    /// Shifting left then right restores everything except the first bit.
    #[test]
    fn shift_left_then_right(buf in prop::collection::vec(any::<u8>(), 1..8)) {
        let mut shifted = buf.clone();
        shift_left_one(&mut shifted);
        shift_right_one(&mut shifted);
        let mut expected = buf.clone();
        prop_assert!(set_bit(&mut expected, 0, false));
        prop_assert_eq!(shifted, expected);
    }

    /// Parity of a vector equals the parity of its popcount.
    #[test]
    fn parity_matches_popcount(bits in prop::collection::vec(any::<bool>(), 0..100)) {
        let v = BitVec::from_bools(&bits);
        let ones = bits.iter().filter(|&&b| b).count();
        prop_assert_eq!(v.parity(), ones % 2 == 1);
    }

    /// Canonical byte form is accepted back, any set padding bit is refused.
    #[test]
    fn bitvec_padding_is_enforced(bits in prop::collection::vec(any::<bool>(), 1..64), pad_bit in 0usize..8) {
        let v = BitVec::from_bools(&bits);
        prop_assert_eq!(BitVec::from_bytes(v.as_bytes(), bits.len()).unwrap(), v.clone());

        let pad = v.as_bytes().len() * 8 - bits.len();
        if pad > 0 {
            let mut dirty = v.as_bytes().to_vec();
            let last = dirty.len() - 1;
            dirty[last] |= 1 << (pad_bit % pad);
            prop_assert!(BitVec::from_bytes(&dirty, bits.len()).is_err());
        }
    }

    /// Nbit text form parses back to the same value.
    #[test]
    fn nbit_display_parses(exponent in any::<u8>(), threshold in any::<u8>()) {
        let nbit = Nbit::new(exponent, threshold);
        prop_assert_eq!(nbit.to_string().parse::<Nbit>().unwrap(), nbit);
    }
}
