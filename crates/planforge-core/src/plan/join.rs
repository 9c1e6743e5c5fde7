use serde::Serialize;
use std::fmt;

///
/// JoinType
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum JoinType {
    #[default]
    Inner,
    LeftOuter,
    RightOuter,
    Semi,
    AntiSemi,
    LeftOuterSemi,
    AntiLeftOuterSemi,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inner => "inner join",
            Self::LeftOuter => "left outer join",
            Self::RightOuter => "right outer join",
            Self::Semi => "semi join",
            Self::AntiSemi => "anti semi join",
            Self::LeftOuterSemi => "left outer semi join",
            Self::AntiLeftOuterSemi => "anti left outer semi join",
        };
        write!(f, "{label}")
    }
}

///
/// JoinSpec
///
/// Join kind plus which child is the inner (build or probe-by-index) side.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub inner_child_idx: usize,
}

impl JoinSpec {
    #[must_use]
    pub const fn new(join_type: JoinType, inner_child_idx: usize) -> Self {
        Self {
            join_type,
            inner_child_idx,
        }
    }
}
