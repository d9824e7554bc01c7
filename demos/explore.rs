//! Exploration pipeline on a toy hotel-review vocabulary: elbow sweep,
//! clustering, highlight, and drill-down.

use std::sync::Arc;

use wordscope::session::{Session, SessionEvent, SessionParams};
use wordscope::view::{DrillTarget, Highlight};
use wordscope::{EmbeddingMatrix, WordFrequencyTable};

fn main() {
    // Stand-in for a trained embedding: three topical groups in 4D.
    let matrix = Arc::new(
        EmbeddingMatrix::new(vec![
            // Room words
            ("kamer".to_string(), vec![0.0, 0.1, 0.2, 0.0]),
            ("bed".to_string(), vec![0.2, 0.0, 0.1, 0.1]),
            ("douche".to_string(), vec![0.1, 0.2, 0.0, 0.2]),
            // Beach words
            ("strand".to_string(), vec![10.0, 10.2, 9.9, 10.1]),
            ("zee".to_string(), vec![10.1, 9.9, 10.1, 10.0]),
            ("duin".to_string(), vec![9.9, 10.1, 10.0, 10.2]),
            // Food words
            ("ontbijt".to_string(), vec![-9.9, -10.1, -10.0, -10.2]),
            ("lekker".to_string(), vec![-10.1, -9.9, -10.2, -10.0]),
        ])
        .unwrap(),
    );
    let freq = Arc::new(WordFrequencyTable::from_counts(vec![
        ("kamer", 12u64),
        ("bed", 7),
        ("douche", 4),
        ("strand", 9),
        ("zee", 9),
        ("duin", 2),
        ("ontbijt", 6),
        ("lekker", 5),
    ]));

    let mut session = Session::new(matrix, freq, SessionParams::default()).unwrap();

    println!("=== Elbow curve ===");
    for point in session.elbow_curve().points() {
        println!("  k = {:2}  total within-SS = {:10.4}", point.k, point.total_within_ss);
    }

    let update = session.apply(SessionEvent::SetClusterCount(3)).unwrap();
    println!("\n=== Scatter (k = 3) ===");
    for record in update.scatter.unwrap() {
        println!(
            "  {:8} cluster {}  ({:6.2}, {:6.2}, {:6.2})  {}",
            record.word, record.cluster_id, record.pc1, record.pc2, record.pc3, record.color
        );
    }

    let beach = session.assignment().id_of("strand").unwrap();
    let update = session
        .apply(SessionEvent::SetHighlight(Highlight::Cluster(beach)))
        .unwrap();
    println!("\n=== Highlight cluster {beach} ===");
    for record in update.scatter.unwrap() {
        println!(
            "  {:8} opacity {:3.1}  legend {}",
            record.word, record.opacity, record.legend
        );
    }

    session.apply(SessionEvent::RequestDrilldown).unwrap();
    let update = session
        .apply(SessionEvent::ApplyDrilldown(DrillTarget::Cluster(beach)))
        .unwrap();
    println!("\n=== Top words, cluster {beach} ===");
    for row in update.top_words.unwrap() {
        println!("  {:8} {:4}x  (cluster {})", row.word, row.frequency, row.cluster_id);
    }
}
