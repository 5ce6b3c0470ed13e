use crate::error::{NotFoundContext, QueryError, QueryResult};
use crate::models::{SoilOptions, SoilParameter, SoilRecord};
use crate::readers::normalize::{canonical_depth, canonical_point_query, compare_points};
use crate::readers::SoilTable;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Point lookup over a loaded soil table, keyed by (point, depth).
#[derive(Debug, Clone, Default)]
pub struct SoilIndex {
    records: Vec<SoilRecord>,
    by_key: HashMap<(String, String), usize>,
    points: Vec<String>,
    depths: Vec<String>,
    parameters: Vec<SoilParameter>,
    duplicate_keys: usize,
}

impl SoilIndex {
    pub fn build(table: SoilTable) -> Self {
        let mut by_key = HashMap::with_capacity(table.records.len());
        let mut points = BTreeSet::new();
        let mut depths = BTreeSet::new();
        let mut duplicate_keys = 0;

        for (position, record) in table.records.iter().enumerate() {
            let key = (record.point.clone(), record.depth.clone());
            // First occurrence in source order wins.
            if by_key.contains_key(&key) {
                duplicate_keys += 1;
            } else {
                by_key.insert(key, position);
            }
            points.insert(record.point.clone());
            depths.insert(record.depth.clone());
        }

        if duplicate_keys > 0 {
            warn!(
                "Soil table has {} duplicate (point, depth) rows; the first occurrence of each is served",
                duplicate_keys
            );
        }

        let mut points: Vec<String> = points.into_iter().collect();
        points.sort_by(|a, b| compare_points(a, b));

        Self {
            records: table.records,
            by_key,
            points,
            depths: depths.into_iter().collect(),
            parameters: table.parameters,
            duplicate_keys,
        }
    }

    /// Look up the record for a caller-supplied point and depth.
    ///
    /// The point must be an integer (any padding or sign); the depth is
    /// compared after trimming.
    pub fn find(&self, point: &str, depth: &str) -> QueryResult<&SoilRecord> {
        let point_key = canonical_point_query(point).map_err(|e| {
            QueryError::InvalidInput(format!("point '{}': {}", point.trim(), e))
        })?;
        let depth_key = canonical_depth(depth)
            .map_err(|e| QueryError::InvalidInput(format!("depth: {}", e)))?;

        match self.by_key.get(&(point_key.clone(), depth_key.clone())) {
            Some(&position) => Ok(&self.records[position]),
            None => Err(QueryError::NotFound(NotFoundContext::Soil {
                ponto: point_key,
                profundidade: depth_key,
                points_disponiveis: self.points.clone(),
                profundidades_disponiveis: self.depths.clone(),
            })),
        }
    }

    pub fn options(&self) -> SoilOptions {
        SoilOptions {
            points: self.points.clone(),
            depths: self.depths.clone(),
        }
    }

    pub fn parameters(&self) -> &[SoilParameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}
