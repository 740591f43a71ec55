//! Lloyd's k-means over 8-bit RGB colors.
//!
//! The loop always runs the requested number of iterations; there is no
//! convergence check and duplicate centroids are kept as they are.

use palette::Srgb;
use rand::Rng;
use tracing::debug;

use crate::error::ClusterError;

type Centroid = [i32; 3];

#[inline(always)]
fn distance_sq(pixel: &Srgb<u8>, centroid: &Centroid) -> i32 {
    let dr = pixel.red as i32 - centroid[0];
    let dg = pixel.green as i32 - centroid[1];
    let db = pixel.blue as i32 - centroid[2];
    dr * dr + dg * dg + db * db
}

/// Index of the nearest centroid; ties go to the lowest index.
fn nearest(pixel: &Srgb<u8>, centroids: &[Centroid]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = i32::MAX;
    for (idx, c) in centroids.iter().enumerate() {
        let d = distance_sq(pixel, c);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    best_idx
}

/// Cluster `pixels` into exactly `k` colors.
///
/// Initial centroids are drawn uniformly, with replacement, from `pixels`
/// using `rng`. Each iteration assigns every pixel to its nearest centroid and
/// moves each centroid to the rounded mean of its members; a centroid with no
/// members keeps its previous value.
pub fn kmeans<R: Rng + ?Sized>(
    pixels: &[Srgb<u8>],
    k: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<Vec<Srgb<u8>>, ClusterError> {
    if pixels.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    if k == 0 {
        return Err(ClusterError::ZeroClusters);
    }

    let mut centroids: Vec<Centroid> = (0..k)
        .map(|_| {
            let p = pixels[rng.random_range(0..pixels.len())];
            [p.red as i32, p.green as i32, p.blue as i32]
        })
        .collect();

    let mut sums = vec![[0u64; 3]; k];
    let mut counts = vec![0u64; k];

    for _ in 0..iterations {
        sums.iter_mut().for_each(|s| *s = [0; 3]);
        counts.iter_mut().for_each(|c| *c = 0);

        for pixel in pixels {
            let idx = nearest(pixel, &centroids);
            sums[idx][0] += pixel.red as u64;
            sums[idx][1] += pixel.green as u64;
            sums[idx][2] += pixel.blue as u64;
            counts[idx] += 1;
        }

        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count == 0 {
                continue;
            }
            for channel in 0..3 {
                centroid[channel] = (sum[channel] as f64 / count as f64).round() as i32;
            }
        }
    }

    debug!(
        pixels = pixels.len(),
        k,
        iterations,
        "k-means finished"
    );

    Ok(centroids
        .into_iter()
        .map(|[r, g, b]| {
            Srgb::new(
                r.clamp(0, 255) as u8,
                g.clamp(0, 255) as u8,
                b.clamp(0, 255) as u8,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rgb(r: u8, g: u8, b: u8) -> Srgb<u8> {
        Srgb::new(r, g, b)
    }

    #[test]
    fn returns_exactly_k_colors() {
        let pixels = vec![rgb(0, 0, 0), rgb(255, 255, 255), rgb(10, 200, 30)];
        let mut rng = StdRng::seed_from_u64(7);
        for k in [1, 2, 3, 12, 40] {
            let out = kmeans(&pixels, k, 20, &mut rng).unwrap();
            assert_eq!(out.len(), k);
        }
    }

    #[test]
    fn single_color_input_collapses_every_centroid() {
        let pixels = vec![rgb(255, 0, 0); 25];
        let mut rng = StdRng::seed_from_u64(1);
        let out = kmeans(&pixels, 12, 20, &mut rng).unwrap();
        assert!(out.iter().all(|c| *c == rgb(255, 0, 0)));
    }

    #[test]
    fn centroids_come_from_the_input_cluster_means() {
        // Two tight, well separated groups: every centroid must end on one of the means.
        let mut pixels = vec![rgb(0, 0, 0), rgb(2, 2, 2)];
        pixels.extend([rgb(250, 250, 250), rgb(254, 254, 254)]);
        let mut rng = StdRng::seed_from_u64(42);
        let out = kmeans(&pixels, 2, 20, &mut rng).unwrap();
        for c in out {
            assert!(c == rgb(1, 1, 1) || c == rgb(252, 252, 252), "{c:?}");
        }
    }

    #[test]
    fn same_seed_gives_same_result() {
        let pixels: Vec<_> = (0..200u32)
            .map(|i| rgb((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 31 % 256) as u8))
            .collect();
        let a = kmeans(&pixels, 12, 20, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = kmeans(&pixels, 12, 20, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_iterations_returns_the_seeded_picks() {
        let pixels = vec![rgb(1, 2, 3), rgb(4, 5, 6)];
        let out = kmeans(&pixels, 5, 0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(out.iter().all(|c| pixels.contains(c)));
    }

    #[test]
    fn ties_go_to_the_earliest_centroid() {
        let centroids = [[0, 0, 0], [20, 0, 0], [20, 0, 0]];
        assert_eq!(nearest(&rgb(10, 0, 0), &centroids), 0);
        assert_eq!(nearest(&rgb(20, 0, 0), &centroids), 1);
    }

    #[test]
    fn rejects_empty_input_and_zero_k() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(kmeans(&[], 12, 20, &mut rng), Err(ClusterError::EmptyInput));
        assert_eq!(
            kmeans(&[rgb(1, 1, 1)], 0, 20, &mut rng),
            Err(ClusterError::ZeroClusters)
        );
    }
}
