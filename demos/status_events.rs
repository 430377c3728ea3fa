use cluster_metrics::*;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let (sample_cnt, sample_dims, k) = (20000, 200, 4);

    // Generate some random data, with a few missing values
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());
    samples.iter_mut().step_by(997).for_each(|v| *v = f64::NAN);
    let assignments: Vec<usize> = (0..sample_cnt).map(|_| rand::random::<usize>() % k).collect();
    let imputation = vec![0.5f64;sample_dims];
    let centroids = CentroidTable::new(vec![0.5f64;k * sample_dims], k, sample_dims).unwrap();

	let conf = MetricsConfig::build()
		.partition_done(&|id, stats|
			println!("Partition {} - Rows: {} | Sum of Squares: {:.2}", id, stats.count(), stats.total_sum_sq_err()))
		.reduction_strategy(ReductionStrategy::ParallelOrdered)
		.work_packets(16)
		.build();

    let metrics = ClusterMetrics::new(centroids);
    match metrics.score_samples(&samples, &assignments, None, &conf) {
        Ok(_) => unreachable!(),
        Err(e) => println!("Scoring without imputation failed: {}", e)
    }

    let mut history: Vec<ClusteringMetrics<f64>> = Vec::new();
    let result = history.register_metrics(
        metrics.score_samples(&samples, &assignments, Some(&imputation), &conf).unwrap());
    for row in result.centroid_stats() {
        println!("Centroid {} | Size: {} | Within Sum of Squares: {:.5}", row.centroid, row.size, row.within_mse);
    }
}
