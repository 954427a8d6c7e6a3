use packed_json::encoding::*;
use packed_json::Packed;
use packed_json_strategy::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode(p in arb_packed()) {
        let enc = encode_full(&p);

        let dec: Result<Packed, _> = decode(&mut Cursor::new(enc.clone()));

        match dec {
            Ok(ref back) if packed_approx_eq(&p, back) => (),
            _ => panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", p, enc, dec),
        }
    }

    #[test]
    fn every_prefix_is_truncated(p in arb_packed()) {
        let enc = encode_full(&p);
        for cut in 0..enc.len() {
            let dec: Result<Packed, _> = decode_full(enc[..cut].to_vec());
            prop_assert!(dec.is_err());
        }
    }

    #[test]
    fn arbitrary_input_never_panics(bs in prop::collection::vec(any::<u8>(), 0..256)) {
        let _: Result<Packed, _> = decode_full(bs);
    }

    #[test]
    fn concatenated_values(a in arb_packed(), b in arb_packed()) {
        let mut enc = encode_full(&a);
        enc.extend(encode_full(&b));

        let cursor = &mut Cursor::new(enc);
        let first: Packed = decode(cursor).unwrap();
        let second: Packed = decode(cursor).unwrap();

        prop_assert!(packed_approx_eq(&a, &first));
        prop_assert!(packed_approx_eq(&b, &second));
        prop_assert!(cursor.is_empty());
    }
}
