//! Property tests for the decode loop's byte ordering and cancellation.

mod common;

use common::frame_port;
use proptest::prelude::*;
use serial_framegrab::{
    CancellationToken, Completion, DeviceHandle, Dimensions, MockOpener, NoProgress,
    StreamDecoder,
};

fn frame_and_cut() -> impl Strategy<Value = (Dimensions, Vec<u8>, usize)> {
    (1usize..6, 1usize..6, 1usize..5).prop_flat_map(|(h, w, c)| {
        let total = h * w * c;
        (
            Just(Dimensions::new(h, w, c)),
            prop::collection::vec(any::<u8>(), total),
            0..=total,
        )
    })
}

proptest! {
    #[test]
    fn full_decode_matches_raster_order((dims, bytes, _cut) in frame_and_cut()) {
        let port = frame_port("MOCK0", &bytes);
        let opener = MockOpener::new().with_port(port.clone());
        let token = CancellationToken::new();

        let result = StreamDecoder::new(&opener)
            .decode(&DeviceHandle::from("MOCK0"), 115_200, dims, &token, &mut NoProgress)
            .unwrap();

        prop_assert_eq!(result.completion, Completion::Full);
        prop_assert_eq!(port.read_calls(), bytes.len());
        for i in 0..dims.height {
            for j in 0..dims.width {
                for k in 0..dims.channels {
                    let n = (i * dims.width + j) * dims.channels + k;
                    prop_assert_eq!(result.grid.get(i, j, k), Some(bytes[n]));
                }
            }
        }
    }

    #[test]
    fn cancellation_keeps_prefix_and_zeroes_rest((dims, bytes, cut) in frame_and_cut()) {
        let token = CancellationToken::new();
        let mut port = frame_port("MOCK0", &bytes);
        port.cancel_after(cut, token.clone());
        let opener = MockOpener::new().with_port(port.clone());

        let result = StreamDecoder::new(&opener)
            .decode(&DeviceHandle::from("MOCK0"), 115_200, dims, &token, &mut NoProgress)
            .unwrap();

        let expected = if cut < bytes.len() { Completion::Partial } else { Completion::Full };
        prop_assert_eq!(result.completion, expected);
        prop_assert_eq!(result.bytes_read, cut);
        prop_assert_eq!(result.rows_completed, cut / dims.row_bytes());
        prop_assert_eq!(port.read_calls(), cut);

        let decoded = result.grid.as_bytes();
        prop_assert_eq!(&decoded[..cut], &bytes[..cut]);
        prop_assert!(decoded[cut..].iter().all(|&b| b == 0));
        prop_assert_eq!(port.close_count(), 1);
    }
}
