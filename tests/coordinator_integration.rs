//! End-to-end coordinator runs over real files.
//!
//! Every test writes its loci, chromosome order and tracks to temporary
//! files and opens the session through `CoordinatorConfig`, the same path
//! the `mtbed` binary takes.

use std::io::Write;
use tempfile::NamedTempFile;

use multitrack_bed::{
    read_intervals, BedError, ChromosomeOrder, CoordinatorConfig, Interval, RetentionPolicy,
};

fn bed_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn iv(chrom: &str, start: i64, end: i64) -> Interval {
    Interval::new(chrom, start, end)
}

fn sorted(mut records: Vec<Interval>) -> Vec<Interval> {
    records.sort_by(|a, b| (&a.chrom, a.start, a.end).cmp(&(&b.chrom, b.start, b.end)));
    records
}

#[test]
fn test_single_locus_with_order_file() {
    let order = bed_file(&["chr1\t248956422", "chr2\t242193529"]);
    let loci = bed_file(&["chr1\t100\t200"]);
    let track = bed_file(&[
        "chr1\t50\t90",
        "chr1\t150\t160",
        "chr1\t210\t300",
        "chr2\t10\t20",
    ]);

    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order_file(order.path())
        .add_track(track.path())
        .with_policy(RetentionPolicy::new().with_retain_prior(true))
        .open()
        .unwrap();

    assert!(c.read().unwrap());
    assert_eq!(c.prior(0).unwrap(), vec![iv("chr1", 50, 90)]);
    assert_eq!(c.current(0).unwrap(), vec![iv("chr1", 150, 160)]);
    assert!(c.current_before(0).unwrap().is_empty());
    assert!(c.current_after(0).unwrap().is_empty());

    assert!(!c.read().unwrap());
    c.read_final().unwrap();
    assert_eq!(c.final_remainder(0).unwrap(), vec![iv("chr1", 210, 300)]);
    let untouched = c.final_untouched(0).unwrap();
    assert_eq!(untouched.chromosomes().collect::<Vec<_>>(), vec!["chr2"]);
    assert_eq!(untouched.get("chr2").unwrap(), &[iv("chr2", 10, 20)][..]);

    c.close();
    c.close();
}

#[test]
fn test_unregistered_locus_chromosome_ends_session() {
    let loci = bed_file(&["chrX\t1\t100", "chr1\t1\t100"]);
    let track = bed_file(&["chr1\t10\t20"]);

    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr1", "chr2"])
        .add_track(track.path())
        .open()
        .unwrap();

    match c.read() {
        Err(BedError::UnknownChromosome(chrom)) => assert_eq!(chrom, "chrX"),
        other => panic!("expected UnknownChromosome, got {:?}", other.map(|_| ())),
    }
    assert!(c.is_eof());
    assert!(!c.read().unwrap());
    assert!(!c.read().unwrap());
}

#[test]
fn test_order_file_wins_over_explicit_list() {
    let order = bed_file(&["chr1"]);
    let loci = bed_file(&["chr1\t1\t100"]);
    let track = bed_file(&["chr1\t10\t20"]);

    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr2"])
        .with_chrom_order_file(order.path())
        .add_track(track.path())
        .open()
        .unwrap();

    assert!(c.read().unwrap());
    assert_eq!(c.order().to_vec(), vec!["chr1"]);
}

#[test]
fn test_open_failures() {
    let loci = bed_file(&["chr1\t1\t100"]);
    let track = bed_file(&["chr1\t10\t20"]);
    let empty = bed_file(&[]);

    // Unreadable track after a good one
    let result = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr1"])
        .add_track(track.path())
        .add_track("/nonexistent/track.bed")
        .open();
    assert!(matches!(result, Err(BedError::UnreadableFile { .. })));

    // Empty track
    let result = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr1"])
        .add_track(empty.path())
        .open();
    assert!(matches!(result, Err(BedError::EmptyFile(_))));

    // Empty loci file
    let result = CoordinatorConfig::new()
        .with_anchor(empty.path())
        .with_chrom_order(["chr1"])
        .add_track(track.path())
        .open();
    assert!(matches!(result, Err(BedError::EmptyFile(_))));

    // Order file without a single name
    let result = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order_file(empty.path())
        .add_track(track.path())
        .open();
    assert!(matches!(result, Err(BedError::EmptyFile(_))));

    // Missing order file
    let result = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order_file("/nonexistent/order.txt")
        .add_track(track.path())
        .open();
    assert!(matches!(result, Err(BedError::UnreadableFile { .. })));

    // Nothing configured
    assert!(matches!(
        CoordinatorConfig::new().open(),
        Err(BedError::MissingConfiguration(_))
    ));
}

/// Loci on chr2 and chr4, a track touching every category once or more.
fn full_pass_fixture() -> (NamedTempFile, NamedTempFile) {
    let loci = bed_file(&["chr2\t100\t200", "chr2\t500\t600", "chr4\t10\t50"]);
    let track = bed_file(&[
        "chr1\t5\t10",
        "chr2\t10\t20",
        "chr2\t90\t110",
        "chr2\t150\t160",
        "chr2\t190\t250",
        "chr2\t300\t310",
        "chr2\t550\t560",
        "chr2\t700\t800",
        "chr3\t1\t5",
        "chr4\t5\t20",
        "chr4\t60\t70",
        "chr5\t1\t2",
    ]);
    (loci, track)
}

const FULL_ORDER: [&str; 5] = ["chr1", "chr2", "chr3", "chr4", "chr5"];

#[test]
fn test_full_retention_accounts_for_every_record() {
    let (loci, track) = full_pass_fixture();
    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(FULL_ORDER)
        .add_track(track.path())
        .with_policy(RetentionPolicy::all())
        .open()
        .unwrap();

    let mut seen = Vec::new();
    while c.read().unwrap() {
        let buf = c.snapshot(0).unwrap();
        seen.extend(buf.prior);
        seen.extend(buf.current_before);
        seen.extend(buf.current);
        seen.extend(buf.current_after);
        seen.extend(buf.remainder);
        seen.extend(buf.prev_chrs.records().cloned());
    }
    c.read_final().unwrap();
    seen.extend(c.final_remainder(0).unwrap());
    seen.extend(c.final_untouched(0).unwrap().records().cloned());

    let expected = read_intervals(track.path()).unwrap();
    assert_eq!(seen.len(), expected.len());
    assert_eq!(sorted(seen), sorted(expected));
}

#[test]
fn test_full_pass_categories() {
    let (loci, track) = full_pass_fixture();
    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(FULL_ORDER)
        .add_track(track.path())
        .with_policy(RetentionPolicy::all())
        .open()
        .unwrap();

    c.read().unwrap();
    assert_eq!(c.prev_chrs(0).unwrap().get("chr1").unwrap(), &[iv("chr1", 5, 10)][..]);
    assert_eq!(c.prior(0).unwrap(), vec![iv("chr2", 10, 20)]);
    assert_eq!(c.current_before(0).unwrap(), vec![iv("chr2", 90, 110)]);
    assert_eq!(c.current(0).unwrap(), vec![iv("chr2", 150, 160)]);
    assert_eq!(c.current_after(0).unwrap(), vec![iv("chr2", 190, 250)]);

    c.read().unwrap();
    assert_eq!(c.prior(0).unwrap(), vec![iv("chr2", 300, 310)]);
    assert_eq!(c.current(0).unwrap(), vec![iv("chr2", 550, 560)]);

    c.read().unwrap();
    assert_eq!(c.remainder(0).unwrap(), vec![iv("chr2", 700, 800)]);
    assert_eq!(c.prev_chrs(0).unwrap().get("chr3").unwrap(), &[iv("chr3", 1, 5)][..]);
    assert_eq!(c.current_before(0).unwrap(), vec![iv("chr4", 5, 20)]);
    assert_eq!(c.last_processed_chr(), Some("chr4"));
}

#[test]
fn test_default_policy_skips_prior_remainder_and_skipped() {
    let (loci, track) = full_pass_fixture();
    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(FULL_ORDER)
        .add_track(track.path())
        .with_policy(RetentionPolicy::new())
        .open()
        .unwrap();

    let mut steps = 0;
    while c.read().unwrap() {
        steps += 1;
        assert!(c.prior(0).unwrap().is_empty());
        assert!(c.prev_chrs(0).unwrap().is_empty());
        assert!(c.remainder(0).unwrap().is_empty());

        match steps {
            1 => {
                assert_eq!(c.current_before(0).unwrap(), vec![iv("chr2", 90, 110)]);
                assert_eq!(c.current(0).unwrap(), vec![iv("chr2", 150, 160)]);
            }
            2 => assert_eq!(c.current(0).unwrap(), vec![iv("chr2", 550, 560)]),
            3 => {
                assert_eq!(c.current_before(0).unwrap(), vec![iv("chr4", 5, 20)]);
                assert!(c.current(0).unwrap().is_empty());
            }
            _ => unreachable!(),
        }
    }
    assert_eq!(steps, 3);
    assert_eq!(c.last_processed_chr(), Some("chr4"));

    c.read_final().unwrap();
    assert_eq!(c.final_remainder(0).unwrap(), vec![iv("chr4", 60, 70)]);
    assert_eq!(c.final_untouched(0).unwrap().record_count(), 1);
}

#[test]
fn test_locus_ranks_never_decrease() {
    let (loci, track) = full_pass_fixture();
    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(FULL_ORDER)
        .add_track(track.path())
        .open()
        .unwrap();

    let order = ChromosomeOrder::from_names(FULL_ORDER);
    let mut last_rank = 0;
    while c.read().unwrap() {
        let rank = order.rank(c.current_chrom().unwrap()).unwrap();
        assert!(rank >= last_rank);
        last_rank = rank;

        let locus = c.current_locus().unwrap();
        for record in c.current(0).unwrap() {
            assert_eq!(record.chrom, locus.chrom);
            assert!(record.overlaps(&locus));
        }
    }
    assert_eq!(c.loci_read(), 3);
}

#[test]
fn test_without_partials_nothing_straddles() {
    let (loci, track) = full_pass_fixture();
    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(FULL_ORDER)
        .add_track(track.path())
        .with_policy(RetentionPolicy::all().with_retain_partial(false))
        .open()
        .unwrap();

    let mut current = Vec::new();
    while c.read().unwrap() {
        assert!(c.current_before(0).unwrap().is_empty());
        assert!(c.current_after(0).unwrap().is_empty());
        current.extend(c.current(0).unwrap());
    }
    assert_eq!(current, vec![iv("chr2", 150, 160), iv("chr2", 550, 560)]);
}

#[test]
fn test_tracks_are_independent() {
    let loci = bed_file(&["chr1\t100\t200\tgeneA", "chr2\t100\t200\tgeneB"]);
    let a = bed_file(&["chr1\t120\t130", "chr2\t120\t130"]);
    let b = bed_file(&["chr2\t150\t160", "chr2\t170\t180"]);

    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr1", "chr2"])
        .with_tracks([a.path(), b.path()])
        .open()
        .unwrap();
    assert_eq!(c.track_count(), 2);

    c.read().unwrap();
    assert_eq!(c.overlapping(0).unwrap().len(), 1);
    assert!(c.overlapping(1).unwrap().is_empty());

    c.read().unwrap();
    assert_eq!(c.current_locus().unwrap().extra, vec!["geneB"]);
    assert_eq!(c.overlapping(0).unwrap(), vec![iv("chr2", 120, 130)]);
    assert_eq!(c.overlapping(1).unwrap().len(), 2);
    assert!(c.overlapping(2).is_none());
}

#[test]
fn test_early_final_flush_stops_reading() {
    let loci = bed_file(&["chr1\t1\t10", "chr1\t100\t200"]);
    let track = bed_file(&["chr1\t5\t6", "chr1\t150\t160"]);

    let mut c = CoordinatorConfig::new()
        .with_anchor(loci.path())
        .with_chrom_order(["chr1"])
        .add_track(track.path())
        .open()
        .unwrap();

    c.read().unwrap();
    c.read_final().unwrap();
    assert_eq!(c.final_remainder(0).unwrap(), vec![iv("chr1", 150, 160)]);
    assert!(!c.read().unwrap());
    assert_eq!(c.loci_read(), 1);
}
