use nebula_facet::{Border3, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError};

use super::{ROADS, SETTLEMENTS};
use crate::block::BlockType;
use crate::settlement::Settlement;
use crate::shape::RoadSegment;

/// Road network tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadParams {
    pub width: f32,
    /// Settlements further apart than this are never connected.
    pub max_length: f32,
    pub material: BlockType,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            width: 3.0,
            max_length: 160.0,
            material: BlockType::Gravel,
        }
    }
}

/// Produces [`ROADS`]: every settlement is joined to its nearest neighbour
/// within `max_length`.
pub struct RoadProvider {
    params: RoadParams,
}

impl RoadProvider {
    pub fn new(params: RoadParams) -> Self {
        Self { params }
    }

    /// Settlements within this many columns of the facet's rectangle may
    /// start a road that reaches it.
    fn reach(&self) -> i32 {
        (self.params.max_length + self.params.width).ceil() as i32
    }

    fn nearest<'s>(&self, from: &Settlement, all: &'s [Settlement]) -> Option<&'s Settlement> {
        all.iter()
            .filter(|s| s.center != from.center)
            .map(|s| (s.center.as_vec2().distance(from.center.as_vec2()), s))
            .filter(|(d, _)| *d <= self.params.max_length)
            .min_by(|(da, a), (db, b)| {
                da.total_cmp(db)
                    .then_with(|| (a.center.y, a.center.x).cmp(&(b.center.y, b.center.x)))
            })
            .map(|(_, s)| s)
    }
}

impl FacetProvider for RoadProvider {
    fn name(&self) -> &str {
        "roads"
    }

    fn declare(&self) -> ProviderDecl {
        let border = self.reach().max(0).saturating_mul(2) as u32;
        ProviderDecl::new()
            .produces(ROADS)
            .requires(SETTLEMENTS, Border3::sides(border))
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        if self.params.width <= 0.0 || self.params.max_length <= 0.0 {
            return Err(ProviderError::InvalidParameter(format!(
                "road width {} and max length {} must be positive",
                self.params.width, self.params.max_length
            )));
        }
        let rect = region.facet_rect(ROADS);
        let settlements = region.facet(SETTLEMENTS)?;
        let sources = rect.expand(self.reach());

        let mut pairs = Vec::new();
        for from in settlements.iter().filter(|s| sources.contains(s.center)) {
            if let Some(to) = self.nearest(from, settlements) {
                let key = |s: &Settlement| (s.center.y, s.center.x);
                pairs.push(if key(from) <= key(to) {
                    (*from, *to)
                } else {
                    (*to, *from)
                });
            }
        }
        pairs.sort_by_key(|(a, b)| (a.center.y, a.center.x, b.center.y, b.center.x));
        pairs.dedup();

        let roads: Vec<RoadSegment> = pairs
            .into_iter()
            .map(|(a, b)| RoadSegment {
                start: a.center.as_vec2(),
                end: b.center.as_vec2(),
                width: self.params.width,
                material: self.params.material,
            })
            .filter(|road| road.footprint().intersects(&rect))
            .collect();

        tracing::trace!(count = roads.len(), "roads laid");
        region.set_facet(ROADS, roads);
        Ok(())
    }
}
