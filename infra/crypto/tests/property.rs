use jtool_crypto::{aes, base64, des};
use proptest::prelude::*;

proptest! {
    #[test]
    fn base64_survives_inserted_whitespace(data in proptest::collection::vec(any::<u8>(), 0..512), gap in 1usize..9) {
        let encoded = base64::encode(&data);
        let spaced: String = encoded
            .chars()
            .enumerate()
            .flat_map(|(i, c)| if i % gap == 0 { vec!['\n', c] } else { vec![c] })
            .collect();
        prop_assert_eq!(base64::decode(&spaced).unwrap(), data);
    }

    #[test]
    fn aes_is_reversible(text in "\\PC{0,200}", password in "\\PC{0,32}") {
        let sealed = aes::encrypt(&text, &password).unwrap();
        prop_assert_eq!(aes::decrypt(&sealed, &password).unwrap(), text);
    }

    #[test]
    fn des_is_reversible(text in "\\PC{0,200}", password in "[a-z0-9]{8,16}") {
        let sealed = des::encrypt_with(&text, &password).unwrap();
        prop_assert_eq!(des::decrypt_with(&sealed, &password).unwrap(), text);
    }
}
