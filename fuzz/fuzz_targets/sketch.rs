#![no_main]

use cardinality_sketch::HyperLogLog;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut hll = HyperLogLog::<[u8]>::new();
    for chunk in data.chunks(4) {
        hll.insert(chunk);

        let estimate = hll.compute_cardinality();
        assert!(estimate >= 1);
        assert_eq!(estimate, hll.get_cardinality());
        assert!(hll.size_of() > 0);

        // re-inserting the same key must not change the estimate
        hll.insert(chunk);
        assert_eq!(hll.compute_cardinality(), estimate);
    }

    // feeding a pre-computed hash goes through the same register path
    hll.insert_hash(wyhash(data, 0));
    assert!(hll.compute_cardinality() >= 1);
});
