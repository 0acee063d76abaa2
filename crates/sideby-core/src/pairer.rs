use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::dedup::DuplicateDetector;
use crate::media::ImageRecord;

/// Counters for one walk over the working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingSummary {
    pub duplicates_skipped: u64,
    pub unpaired: u64,
}

/// Shuffle uniformly, or sort ascending by capture date. Ties keep no particular order.
pub fn order<R: Rng + ?Sized>(records: &mut [ImageRecord], shuffle: bool, rng: &mut R) {
    if shuffle {
        records.shuffle(rng);
    } else {
        records.sort_unstable_by_key(|r| r.creation_date);
    }
}

/// Walk neighbours `(i, i+1)`. A byte-identical neighbour advances by one so the
/// second image is retried against the next; an accepted pair advances by two.
/// `on_pair` runs to completion before the next comparison.
pub fn walk_pairs<F>(records: &[ImageRecord], detector: &mut DuplicateDetector, mut on_pair: F) -> PairingSummary
where
    F: FnMut(&ImageRecord, &ImageRecord),
{
    let mut summary = PairingSummary::default();
    let n = records.len();
    let mut i = 0;

    while i + 1 < n {
        let a = &records[i];
        let b = &records[i + 1];

        if detector.files_are_equal(&a.full_path, &b.full_path) {
            info!("Duplicate skipped: {} and {} are identical", a.file_name, b.file_name);
            summary.duplicates_skipped += 1;
            i += 1;
            continue;
        }

        on_pair(a, b);
        i += 2;
    }

    // The cascade can consume the tail, so only a final single element left over counts.
    if i + 1 == n {
        info!("Unpaired, skipped: {}", records[i].file_name);
        summary.unpaired += 1;
    }

    summary
}
