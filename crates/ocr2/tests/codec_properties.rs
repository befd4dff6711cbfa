// Path: crates/ocr2/tests/codec_properties.rs

use gauntlet_ocr2::{deserialize, serialize, OffchainConfig, ReportingPluginConfig};
use proptest::prelude::*;

const WORDS: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn arb_key() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<u8>(), 32).prop_map(hex::encode)
}

prop_compose! {
    fn arb_config()(
        deltas in proptest::array::uniform5(0i64..=i64::MAX),
        max_durations in proptest::array::uniform5(0i64..=i64::MAX),
        r_max in 1i64..255,
        s in proptest::collection::vec(0i64..=31, 0..10),
        keys in proptest::collection::vec(arb_key(), 0..8),
        peer_ids in proptest::collection::vec("12D3KooW[a-zA-Z0-9]{8}", 0..8),
        alpha_report_ppb in any::<u64>(),
        alpha_accept_ppb in any::<u64>(),
        infinite in any::<(bool, bool)>(),
        delta_c in 0i64..=i64::MAX,
    ) -> OffchainConfig {
        OffchainConfig {
            delta_progress_nanoseconds: deltas[0],
            delta_resend_nanoseconds: deltas[1],
            delta_round_nanoseconds: deltas[2],
            delta_grace_nanoseconds: deltas[3],
            delta_stage_nanoseconds: deltas[4],
            r_max,
            s,
            offchain_public_keys: keys,
            peer_ids,
            reporting_plugin_config: ReportingPluginConfig {
                alpha_report_infinite: infinite.0,
                alpha_report_ppb,
                alpha_accept_infinite: infinite.1,
                alpha_accept_ppb,
                delta_c_nanoseconds: delta_c,
            },
            max_duration_query_nanoseconds: max_durations[0],
            max_duration_observation_nanoseconds: max_durations[1],
            max_duration_report_nanoseconds: max_durations[2],
            max_duration_should_accept_finalized_report_nanoseconds: max_durations[3],
            max_duration_should_transmit_accepted_report_nanoseconds: max_durations[4],
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_inverts_encode(config in arb_config(), secret in "[a-z ]{1,40}") {
        let out = serialize(&config, &[], &secret, Some(WORDS)).unwrap();
        prop_assert_eq!(deserialize(&out.offchain_config_bytes), config);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = deserialize(&bytes);
    }
}
