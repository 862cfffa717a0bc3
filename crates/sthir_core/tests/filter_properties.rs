use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sthir_core::bits::bits_to_uint;
use sthir_core::codec::{bit_length, decode, encode, get_range};
use sthir_core::query::{counter_at, estimate_frequency};
use sthir_core::{optimal_m_k, AccuracyReport, BuildConfig, FilterBundle, SpectralBloom, TokenCounts};

fn random_counts(rng: &mut StdRng, distinct: usize, max_count: u32) -> TokenCounts {
    let mut tc = TokenCounts::new();
    for i in 0..distinct {
        tc.add(&format!("word{i}"), rng.random_range(1..=max_count));
    }
    tc
}

#[test]
fn every_counter_reads_back_through_get_range() {
    let mut rng = StdRng::seed_from_u64(11);
    for chunk in [1u8, 3, 4, 7, 10] {
        let counts = random_counts(&mut rng, 60, 40);
        let (m, k) = optimal_m_k(counts.distinct(), 0.05).unwrap();
        let f = SpectralBloom::build(&counts, m, k, chunk).unwrap();
        let enc = f.encode();
        let w = chunk as usize;
        assert_eq!(bit_length(&enc).unwrap(), m * w);
        for i in 0..m {
            let bits = get_range(&enc, i * w, (i + 1) * w).unwrap();
            assert_eq!(bits.len(), w);
            assert_eq!(bits_to_uint(&bits), f.counter(i).unwrap() as u32);
            assert_eq!(counter_at(&enc, i, chunk).unwrap(), f.counter(i).unwrap() as u32);
        }
        assert_eq!(decode(&enc).unwrap(), f.to_bits());
        assert_eq!(encode(&decode(&enc).unwrap()), enc);
    }
}

#[test]
fn inserted_words_are_never_undercounted() {
    let mut rng = StdRng::seed_from_u64(23);
    let counts = random_counts(&mut rng, 500, 20);
    // deliberately undersized so collisions happen
    let f = SpectralBloom::build(&counts, 900, 3, 4).unwrap();
    let max = f.saturation() as u32;
    for (w, c) in counts.iter() {
        let est = f.estimate(w).unwrap();
        assert!(est >= c.min(max), "{w}: true {c}, estimated {est}");
        assert!(est <= max);
    }
}

#[test]
fn lone_heavy_word_reads_saturation() {
    for chunk in 1..=10u8 {
        let mut counts = TokenCounts::new();
        let max = (1u32 << chunk) - 1;
        counts.add("heavy", max);
        let b = FilterBundle::build("d", "t", &counts, &BuildConfig { false_positive: 0.01, chunk_size: chunk }).unwrap();
        assert_eq!(estimate_frequency(&b, "heavy").unwrap(), max);

        let mut counts = TokenCounts::new();
        counts.add("heavy", max * 3 + 1);
        let b = FilterBundle::build("d", "t", &counts, &BuildConfig { false_positive: 0.01, chunk_size: chunk }).unwrap();
        assert_eq!(estimate_frequency(&b, "heavy").unwrap(), max);
    }
}

#[test]
fn false_positive_rate_tracks_target() {
    let mut rng = StdRng::seed_from_u64(0xB100);
    let p = 0.1;
    let counts = random_counts(&mut rng, 1000, 5);
    let (m, k) = optimal_m_k(counts.distinct(), p).unwrap();
    let f = SpectralBloom::build(&counts, m, k, 4).unwrap();

    let probes: Vec<String> = (0..20_000).map(|i| format!("probe{i}")).collect();
    let r = AccuracyReport::evaluate(&f, &counts, probes.iter().map(String::as_str)).unwrap();
    assert_eq!(r.unseen, probes.len());
    let rate = r.fp_rate();
    assert!((0.05..0.16).contains(&rate), "measured {rate}, target {p}");
}

#[test]
fn estimates_survive_serialization() {
    let mut rng = StdRng::seed_from_u64(5);
    let counts = random_counts(&mut rng, 200, 9);
    let b = FilterBundle::build("doc", "Doc", &counts, &BuildConfig::default()).unwrap();
    let json = serde_json::to_string(&b).unwrap();
    let back: FilterBundle = serde_json::from_str(&json).unwrap();
    let f = SpectralBloom::build(&counts, b.m, b.k, b.chunk_size).unwrap();
    for (w, _) in counts.iter().take(50) {
        assert_eq!(estimate_frequency(&back, w).unwrap(), f.estimate(w).unwrap());
    }
}
