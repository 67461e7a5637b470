/// Log-spaced partition of `[1, max_rank]` into a fixed number of bands.
///
/// Band 0 holds the most frequent words; the geometric spacing mirrors the
/// Zipfian shape of frequency lists so each band carries comparable
/// difficulty spread.
#[derive(Debug, Clone)]
pub struct BandPartition {
    max_rank: u32,
    /// `band_count + 1` strictly increasing edges; band `i` spans
    /// `edges[i] ..= edges[i + 1] - 1`, except the last which ends at
    /// `max_rank` inclusive.
    edges: Vec<u32>,
}

impl BandPartition {
    pub fn new(max_rank: u32, band_count: usize) -> Self {
        let max_rank = max_rank.max(2);
        let band_count = band_count.max(1).min(max_rank as usize);
        let base = max_rank as f64;

        let mut edges = Vec::with_capacity(band_count + 1);
        edges.push(1u32);
        for i in 1..band_count {
            let raw = base.powf(i as f64 / band_count as f64).round() as u32;
            let prev = *edges.last().unwrap_or(&1);
            edges.push(raw.max(prev + 1).min(max_rank));
        }
        edges.push(max_rank + 1);

        Self { max_rank, edges }
    }

    pub fn band_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn max_rank(&self) -> u32 {
        self.max_rank
    }

    pub fn band_of(&self, rank: u32) -> usize {
        let rank = rank.clamp(1, self.max_rank);
        match self.edges.binary_search(&rank) {
            Ok(i) => i.min(self.band_count() - 1),
            Err(i) => i - 1,
        }
    }

    /// Inclusive rank range of band `i`.
    pub fn band_range(&self, band: usize) -> (u32, u32) {
        let band = band.min(self.band_count() - 1);
        let lo = self.edges[band];
        let hi = self.edges[band + 1] - 1;
        (lo, hi.min(self.max_rank))
    }

    pub fn band_width(&self, band: usize) -> u32 {
        let (lo, hi) = self.band_range(band);
        hi - lo + 1
    }

    /// Geometric midpoint of a band, the natural probe target inside it.
    pub fn mid_rank(&self, band: usize) -> u32 {
        let (lo, hi) = self.band_range(band);
        let mid = ((lo as f64) * (hi as f64)).sqrt().round() as u32;
        mid.clamp(lo, hi)
    }
}
