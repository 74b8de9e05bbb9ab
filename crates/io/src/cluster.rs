use crate::Cite;

pub type ClusterId = u32;

/// An ordered group of cites rendered together as one citation instance,
/// e.g. everything inside one pair of parentheses or one footnote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub cites: Vec<Cite>,
}
