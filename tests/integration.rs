use anvil_nbt::chunk::ChunkColumn;
use anvil_nbt::nbt::NbtTag;
use anvil_nbt::nbt::encode::write_named_tag;
use anvil_nbt::nbt::parse::parse_named_tag;
use anvil_nbt::palette::BlockState;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use indexmap::IndexMap;
use std::io::{Read, Write};

#[test]
fn test_complex_nbt_round_trip_gzip() {
    let mut root_map = IndexMap::new();

    // Some basic types
    root_map.insert("byte".to_string(), NbtTag::Byte(127));
    root_map.insert("short".to_string(), NbtTag::Short(32767));
    root_map.insert("int".to_string(), NbtTag::Int(2147483647));

    // List of Strings
    let list = vec![
        NbtTag::String("A".to_string()),
        NbtTag::String("B".to_string()),
        NbtTag::String("C".to_string()),
    ];
    root_map.insert("list".to_string(), NbtTag::List(list));

    // Arrays
    root_map.insert("intArray".to_string(), NbtTag::IntArray(vec![1, 2, 3]));

    // Compound
    let mut nested = IndexMap::new();
    nested.insert("key".to_string(), NbtTag::String("value".to_string()));
    root_map.insert("nested".to_string(), NbtTag::Compound(nested));

    let root = NbtTag::Compound(root_map);

    // 1. Encode
    let mut raw_buf = Vec::new();
    write_named_tag(&mut raw_buf, "Level", &root).expect("Failed to encode");

    // 2. Gzip (simulating a level.dat)
    let mut gzipped = Vec::new();
    let mut encoder = GzEncoder::new(&mut gzipped, Compression::default());
    encoder.write_all(&raw_buf).expect("Failed to gzip");
    encoder.finish().expect("Failed to finish gzip");

    // 3. Gunzip
    let mut decoder = GzDecoder::new(&gzipped[..]);
    let mut unzipped = Vec::new();
    decoder
        .read_to_end(&mut unzipped)
        .expect("Failed to gunzip");
    assert_eq!(unzipped, raw_buf);

    // 4. Decode
    let mut input = &unzipped[..];
    let (name, decoded) = parse_named_tag(&mut input).expect("Failed to decode");

    assert_eq!(name, "Level");
    assert_eq!(decoded, root);
}

/// Mirrors the "Hello World" NBT fixture from the Anvil format
/// documentation without requiring the actual binary asset on disk.
#[test]
fn test_hello_world_nbt_shape() {
    let mut root = IndexMap::new();
    root.insert(
        "name".to_string(),
        NbtTag::String("Bananrama".to_string()),
    );
    let tag = NbtTag::Compound(root);

    let mut buf = Vec::new();
    write_named_tag(&mut buf, "hello world", &tag).unwrap();

    let mut input = &buf[..];
    let (name, decoded) = parse_named_tag(&mut input).unwrap();
    assert_eq!(name, "hello world");
    assert_eq!(decoded, tag);
}

#[test]
fn test_anvil_round_trip() {
    use anvil_nbt::anvil::RegionFile;

    let temp_dir = std::env::temp_dir();
    let mca_path = temp_dir.join(format!(
        "r.0.0-{}-test_anvil_round_trip.mca",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&mca_path);

    // 1. Write
    {
        let region = RegionFile::open(&mca_path, 0, 0).unwrap();
        let mut column = ChunkColumn::new(0, 0, 3465);
        column
            .set_block_state(0, 0, 0, BlockState::new("minecraft:stone"))
            .unwrap();
        region.write_column(column).unwrap();
    }

    // 2. Read back with a fresh handle
    {
        let region = RegionFile::open(&mca_path, 0, 0).unwrap();
        let column = region.get_chunk(0, 0).unwrap().expect("chunk present");
        let column = column.lock().unwrap();
        assert_eq!(column.data_version(), 3465);
        assert_eq!(
            column.get_block_state(0, 0, 0).unwrap().name,
            "minecraft:stone"
        );
    }

    std::fs::remove_file(mca_path).ok();
}

/// Exercises the literal field values from the classic "bigtest" NBT
/// fixture (longTest/doubleTest/floatTest, plus the 1000-element
/// byteArrayTest formula `(n*n*255 + n*7) % 100`) rather than made-up
/// stand-ins, gzip round-tripped the way `level.dat` is on disk.
#[test]
fn test_bigtest_nbt_values_round_trip() {
    let mut root = IndexMap::new();
    root.insert("longTest".to_string(), NbtTag::Long(9223372036854775807));
    root.insert("doubleTest".to_string(), NbtTag::Double(0.49312871321823148));
    root.insert("floatTest".to_string(), NbtTag::Float(0.49823147058486938));

    let byte_array: Vec<u8> = (0..1000i64)
        .map(|n| (((n * n * 255 + n * 7) % 100) as i8) as u8)
        .collect();
    assert_eq!(&byte_array[..5], &[0, 62, 34, 16, 8]);
    root.insert(
        "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, 34, 16, 8, ...))"
            .to_string(),
        NbtTag::ByteArray(byte_array.clone()),
    );

    let tag = NbtTag::Compound(root);

    let mut raw = Vec::new();
    write_named_tag(&mut raw, "Level", &tag).expect("Failed to encode");

    let mut gzipped = Vec::new();
    let mut encoder = GzEncoder::new(&mut gzipped, Compression::default());
    encoder.write_all(&raw).expect("Failed to gzip");
    encoder.finish().expect("Failed to finish gzip");

    let mut decoder = GzDecoder::new(&gzipped[..]);
    let mut unzipped = Vec::new();
    decoder.read_to_end(&mut unzipped).expect("Failed to gunzip");

    let mut input = &unzipped[..];
    let (_name, decoded) = parse_named_tag(&mut input).expect("Failed to decode");
    let map = decoded.as_compound().expect("root is a compound");

    assert_eq!(map.get("longTest"), Some(&NbtTag::Long(9223372036854775807)));
    assert_eq!(
        map.get("doubleTest"),
        Some(&NbtTag::Double(0.49312871321823148))
    );
    assert_eq!(
        map.get("floatTest"),
        Some(&NbtTag::Float(0.49823147058486938))
    );

    match map
        .get("byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, 34, 16, 8, ...))")
        .expect("byteArrayTest present")
    {
        NbtTag::ByteArray(decoded_array) => assert_eq!(decoded_array, &byte_array),
        other => panic!("expected ByteArray, got {other:?}"),
    }
}

/// spec §4.6's "write, then relink, then free the old sectors" ordering
/// means overwriting a chunk with a larger column leaves its previous
/// sector run reclaimable: a later chunk that fits in that run should
/// reuse it instead of growing the file further.
#[test]
fn test_overwrite_reclaims_previous_chunk_sectors() {
    use anvil_nbt::anvil::RegionFile;

    let temp_dir = std::env::temp_dir();
    let mca_path = temp_dir.join(format!(
        "r.0.0-{}-test_overwrite_reclaims_sectors.mca",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&mca_path);

    let region = RegionFile::open(&mca_path, 0, 0).unwrap();

    let mut small = ChunkColumn::new(0, 0, 3465);
    small
        .set_block_state(0, 0, 0, BlockState::new("minecraft:stone"))
        .unwrap();
    region.write_column(small).unwrap();
    let len_after_small = std::fs::metadata(&mca_path).unwrap().len();

    // A payload too large (and too high-entropy to compress away) to fit in
    // the sectors the small chunk above used, forcing it to append past EOF.
    let filler: Vec<u8> = (0..30_000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 16) as u8)
        .collect();
    let mut large = ChunkColumn::new(0, 0, 3465);
    large.set_extra("Filler", NbtTag::ByteArray(filler));
    region.write_column(large).unwrap();
    let len_after_large = std::fs::metadata(&mca_path).unwrap().len();
    assert!(
        len_after_large > len_after_small,
        "overwriting with a much larger column should grow the file"
    );

    // A fresh small chunk at a different slot should now reuse the sectors
    // the (0,0) overwrite freed, rather than appending past the current EOF.
    let mut reused = ChunkColumn::new(1, 0, 3465);
    reused
        .set_block_state(0, 0, 0, BlockState::new("minecraft:dirt"))
        .unwrap();
    region.write_column(reused).unwrap();
    let len_after_reused = std::fs::metadata(&mca_path).unwrap().len();
    assert_eq!(
        len_after_reused, len_after_large,
        "new chunk should reuse the reclaimed sectors, not grow the file"
    );

    std::fs::remove_file(mca_path).ok();
}

#[test]
fn test_issue_3_full_sweep_survives_a_load_and_forget_pass() {
    use anvil_nbt::anvil::RegionFile;

    let temp_dir = std::env::temp_dir();
    let mca_path = temp_dir.join(format!(
        "r.0.0-{}-test_issue_3_full_sweep.mca",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&mca_path);

    let region = RegionFile::open(&mca_path, 0, 0).unwrap();
    for cx in 0..32 {
        for cz in 0..32 {
            let mut column = ChunkColumn::new(cx, cz, 3465);
            column
                .set_block_state(0, 0, 0, BlockState::new("minecraft:dirt"))
                .unwrap();
            region.write_column(column).unwrap();
            region.forget(cx, cz).unwrap();
        }
    }

    // spec.md §8 scenario 3: loading and forgetting every populated chunk,
    // with no further writes, must leave the file byte-identical.
    let bytes_before = std::fs::read(&mca_path).unwrap();

    for cx in 0..32 {
        for cz in 0..32 {
            assert!(region.has_chunk(cx, cz).unwrap());
            let column = region.get_chunk(cx, cz).unwrap().unwrap();
            {
                let column = column.lock().unwrap();
                assert_eq!(
                    column.get_block_state(0, 0, 0).unwrap().name,
                    "minecraft:dirt"
                );
            }
            region.forget(cx, cz).unwrap();
        }
    }

    let bytes_after = std::fs::read(&mca_path).unwrap();
    assert_eq!(
        bytes_before, bytes_after,
        "loading and forgetting every populated chunk must not change the file on disk"
    );

    std::fs::remove_file(mca_path).ok();
}
