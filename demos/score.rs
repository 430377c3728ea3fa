use cluster_metrics::*;

fn main() {
    let (sample_cnt, sample_dims, k) = (20000, 200, 4);

    // Generate some random data, and assign it to random clusters
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());
    let assignments: Vec<usize> = (0..sample_cnt).map(|_| rand::random::<usize>() % k).collect();
    let centroids = CentroidTable::new(vec![0.5f64;k * sample_dims], k, sample_dims).unwrap();

    // Score, using one partition per worker thread
    let metrics = ClusterMetrics::new(centroids);
    let result = metrics.score_samples(&samples, &assignments, None, &MetricsConfig::default()).unwrap();

    println!("Sizes: {:?}", result.size);
    println!("Within-cluster MSE: {:?}", result.within_mse);
    println!("Avg. SS: {} | Within: {} | Between: {}", result.avg_ss, result.avg_within_ss, result.avg_between_ss);
}
