//! Property tests for the register decoder, view selection and counter.

use motorola_6883::{
    ControlRegister, Decode, RamCapacity, Sam6883, SamConfig, VideoCounter, VideoMode,
    ViewSelection,
};
use proptest::prelude::*;

fn capacity() -> impl Strategy<Value = RamCapacity> {
    prop::sample::select(RamCapacity::SUPPORTED.to_vec())
        .prop_map(|bytes| RamCapacity::try_from(bytes).unwrap())
}

proptest! {
    #[test]
    fn alter_changes_at_most_the_addressed_bit(state in any::<u16>(), offset in 0u16..32) {
        let mut reg = ControlRegister::new(state);
        let change = reg.alter(offset);
        let bit = 1u16 << (offset >> 1);
        prop_assert_eq!(change & !bit, 0);
        prop_assert_eq!(reg.bits() & bit != 0, offset & 1 == 1);
        prop_assert_eq!(reg.bits() ^ state, change);
    }

    #[test]
    fn decoded_ram_offsets_stay_in_bounds(state in any::<u16>(), cap in capacity(), address in any::<u16>()) {
        let view = ViewSelection::recompute(ControlRegister::new(state), false);
        if let Decode::Ram(offset) = view.decode(address, cap) {
            prop_assert!(offset < cap.bytes());
        }
    }

    #[test]
    fn endc_round_trip_is_exact(state in any::<u16>(), cap in capacity(), writes in prop::collection::vec(0u16..32, 0..16)) {
        let mut sam = Sam6883::new(SamConfig::mc6883(14_318_180, cap.bytes()), ()).unwrap();
        sam.restore(&motorola_6883::SamSnapshot { state, ..Default::default() }).unwrap();
        for offset in writes {
            sam.write(offset, 0);
        }
        let before = sam.view();
        sam.endc_w(true);
        prop_assert_eq!(sam.view(), ViewSelection::DISABLED);
        sam.endc_w(false);
        prop_assert_eq!(sam.view(), before);
    }

    #[test]
    fn dividers_stay_below_their_thresholds(mode in 0u8..8, toggles in 0usize..2000, syncs in 0usize..8) {
        let mode = VideoMode::try_from(mode).unwrap();
        let mut c = VideoCounter::default();
        for n in 0..toggles {
            c.clock_da0(n % 2 == 0, mode);
            if syncs > 0 && n % (toggles / syncs + 1) == 0 {
                c.horizontal_sync(mode);
            }
            prop_assert!(c.xdiv < mode.x_division());
            prop_assert!(c.ydiv < mode.y_division());
        }
    }
}
