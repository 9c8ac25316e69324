use super::system::SizeClass;

/// Performance parameters selected by a system's [`SizeClass`].
///
/// Larger systems trade some resolution for speed: a coarser PME grid, a longer pair list
/// and larger patches. `Small` and `Tiny` share the most conservative tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeProfile {
    /// `PMEGridSpacing`, in Å.
    pub pme_grid_spacing: f64,
    /// `pairlistdist`, in Å.
    pub pairlist_distance: f64,
    /// `patchDimension`, in Å.
    pub patch_dimension: f64,
}

const XLARGE: SizeProfile = SizeProfile {
    pme_grid_spacing: 1.0,
    pairlist_distance: 13.0,
    patch_dimension: 20.0,
};

const MEDIUM: SizeProfile = SizeProfile {
    pme_grid_spacing: 0.9,
    pairlist_distance: 12.5,
    patch_dimension: 18.0,
};

const CONSERVATIVE: SizeProfile = SizeProfile {
    pme_grid_spacing: 0.8,
    pairlist_distance: 12.0,
    patch_dimension: 16.0,
};

impl SizeProfile {
    pub const fn for_class(class: SizeClass) -> Self {
        match class {
            SizeClass::Xlarge => XLARGE,
            SizeClass::Medium => MEDIUM,
            SizeClass::Small | SizeClass::Tiny => CONSERVATIVE,
        }
    }
}

impl From<SizeClass> for SizeProfile {
    fn from(class: SizeClass) -> Self {
        Self::for_class(class)
    }
}
