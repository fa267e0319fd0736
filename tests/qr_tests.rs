use image::GrayImage;
use qrsym::QR;

// Reads the module matrix with an independent decoder, returning (version, ecc bits, mask,
// content)
fn read_back(qr: &QR) -> (usize, u16, u16, Vec<u8>) {
    let grid = rqrr::SimpleGrid::from_func(qr.width(), |x, y| qr.is_dark(y as i16, x as i16));
    let grid = rqrr::Grid::new(grid);
    let mut content = Vec::new();
    let meta = grid.decode_to(&mut content).expect("Failed to read QR");
    (meta.version.0, meta.ecc_level, meta.mask, content)
}

// Locates the symbol in a rendered image. Large symbols can yield extra candidate grids,
// so the first one that decodes wins.
fn read_back_image(img: GrayImage) -> Vec<u8> {
    let mut img = rqrr::PreparedImage::prepare(img);
    let grids = img.detect_grids();
    assert!(!grids.is_empty(), "No symbol detected");
    grids
        .iter()
        .find_map(|g| {
            let mut content = Vec::new();
            g.decode_to(&mut content).ok().map(|_| content)
        })
        .expect("No detected symbol could be read")
}

fn assert_metadata(qr: &QR, version: usize, ecc_level: u16, mask: u16) {
    assert_eq!(*qr.version(), version);
    assert_eq!(qr.ec_level().format_bits() as u16, ecc_level);
    assert_eq!(qr.mask().map(|m| *m as u16), Some(mask));
}

#[cfg(test)]
mod qr_proptests {
    use proptest::prelude::*;
    use proptest::string::string_regex;

    use super::{read_back, read_back_image};
    use qrsym::*;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    pub fn qr_strategy(regex: &'static str, max_sz: usize) -> impl Strategy<Value = (ECLevel, String)> {
        ec_level_strategy().prop_flat_map(move |ecl| {
            let pattern = format!(r"{regex}{{1,{max_sz}}}");
            string_regex(&pattern).unwrap().prop_map(move |data| (ecl, data))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn proptest_numeric(params in qr_strategy("[0-9]", 300)) {
            let (ecl, data) = params;
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            prop_assert!(qr.ec_level() >= ecl);

            let decoded = read_back_image(qr.to_image(3));
            prop_assert_eq!(data.as_bytes(), &decoded[..]);
        }

        #[test]
        fn proptest_alphanumeric(params in qr_strategy(r"[0-9A-Z $%*+\-./:]", 200)) {
            let (ecl, data) = params;
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();

            let decoded = read_back_image(qr.to_image(3));
            prop_assert_eq!(data.as_bytes(), &decoded[..]);
        }

        #[test]
        fn proptest_bytes(data in prop::collection::vec(any::<u8>(), 1..150), ecl in ec_level_strategy()) {
            let qr = QRBuilder::new(&data).ec_level(ecl).build().unwrap();

            let (version, _, _, decoded) = read_back(&qr);
            prop_assert_eq!(version, *qr.version());
            prop_assert_eq!(&read_back_image(qr.to_image(3)), &decoded);
            prop_assert_eq!(data, decoded);
        }
    }
}

#[cfg(test)]
mod qr_tests {
    use test_case::test_case;

    use super::{assert_metadata, read_back, read_back_image};
    use qrsym::{ECLevel, MaskPattern, QRBuilder, QRError, Segment, Version};

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L, ECLevel::L; "test_qr_1")]
    #[test_case("TEST".to_string(), 1, ECLevel::M, ECLevel::H; "test_qr_2")]
    #[test_case("12345".to_string(), 1, ECLevel::Q, ECLevel::H; "test_qr_3")]
    #[test_case("OK".to_string(), 1, ECLevel::H, ECLevel::H; "test_qr_4")]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(3), 7, ECLevel::L, ECLevel::L; "test_qr_5")]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M, ECLevel::M; "test_qr_6")]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3), 7, ECLevel::Q, ECLevel::Q; "test_qr_7")]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H, ECLevel::H; "test_qr_8")]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(4), 10, ECLevel::L, ECLevel::M; "test_qr_9")]
    #[test_case("A11111111111111".repeat(20), 10, ECLevel::M, ECLevel::M; "test_qr_10")]
    #[test_case("aAAAAAAAAA1111111111111111AAAAAAAAAAa".repeat(4), 10, ECLevel::Q, ECLevel::Q; "test_qr_11")]
    #[test_case("1234567890".repeat(28), 10, ECLevel::H, ECLevel::H; "test_qr_12")]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(22), 27, ECLevel::L, ECLevel::M; "test_qr_13")]
    #[test_case("A111111111111111".repeat(100), 27, ECLevel::M, ECLevel::M; "test_qr_14")]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(20), 27, ECLevel::Q, ECLevel::Q; "test_qr_15")]
    #[test_case("1234567890".repeat(145), 27, ECLevel::H, ECLevel::H; "test_qr_16")]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(57), 40, ECLevel::L, ECLevel::L; "test_qr_17")]
    #[test_case("A111111111111111".repeat(97), 40, ECLevel::M, ECLevel::H; "test_qr_18")]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(42), 40, ECLevel::Q, ECLevel::Q; "test_qr_19")]
    #[test_case("1234567890".repeat(305), 40, ECLevel::H, ECLevel::H; "test_qr_20")]
    fn test_qr(data: String, version: usize, ecl: ECLevel, exp_ecl: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes())
            .version(Version::new(version))
            .ec_level(ecl)
            .build()
            .unwrap();
        assert_eq!(qr.ec_level(), exp_ecl);

        let (v, ecc_level, mask, decoded) = read_back(&qr);
        assert_metadata(&qr, v, ecc_level, mask);
        assert_eq!(v, version);
        assert_eq!(data.as_bytes(), decoded);
        assert_eq!(read_back_image(qr.to_image(3)), decoded);
    }

    #[test_case("0123456789".repeat(4) + "0", 1; "41 digits")]
    #[test_case("0123456789".repeat(4) + "01", 2; "42 digits")]
    #[test_case("HELLO WORLD".to_string(), 1; "alphanumeric")]
    #[test_case("ab".repeat(500), 22; "1000 bytes")]
    fn test_smallest_version(data: String, exp_version: usize) {
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*qr.version(), exp_version);

        let (v, _, _, decoded) = read_back(&qr);
        assert_eq!(v, exp_version);
        assert_eq!(data.as_bytes(), decoded);
    }

    #[test]
    fn test_all_masks() {
        for m in MaskPattern::all() {
            let qr = QRBuilder::new(b"https://example.com/qr?id=42").mask(m).build().unwrap();

            let (v, ecc_level, mask, decoded) = read_back(&qr);
            assert_metadata(&qr, v, ecc_level, mask);
            assert_eq!(mask, *m as u16);
            assert_eq!(decoded, b"https://example.com/qr?id=42");
        }
    }

    #[test]
    fn test_binary() {
        let data = (0..=255u8).collect::<Vec<_>>();
        let qr = QRBuilder::new(&data).ec_level(ECLevel::Q).build().unwrap();

        let (_, _, _, decoded) = read_back(&qr);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_mixed_segments() {
        let segs = vec![
            Segment::make_bytes(b"Order #"),
            Segment::make_numeric("20240917").unwrap(),
            Segment::make_alphanumeric(" QTY:12").unwrap(),
        ];
        let qr = QRBuilder::from_segments(segs).build().unwrap();

        let decoded = read_back_image(qr.to_image(4));
        assert_eq!(decoded, b"Order #20240917 QTY:12");
    }

    #[test]
    fn test_deterministic() {
        let build = || QRBuilder::new(b"Deterministic output").build().unwrap();
        assert_eq!(build(), build());
    }

    #[test]
    fn test_data_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes()).version(Version::new(40)).ec_level(ECLevel::H).build();
        assert_eq!(res.unwrap_err(), QRError::DataTooLong);
        assert_eq!(QRError::DataTooLong.to_string(), "Data too long");
    }
}
