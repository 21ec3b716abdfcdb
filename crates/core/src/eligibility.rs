//! Eligibility classification.
//!
//! Pure functions over resolver output. A patient is eligible when every role in
//! [`FileRole::REQUIRED`] is present; missing items are listed in that same fixed order
//! so displays stay stable between refreshes.
//!
//! Descriptions are static English templates keyed by role. Localisation belongs to
//! whatever presents them.

use crate::paths::FileRole;
use std::collections::BTreeMap;

/// Describes what a role expects to find, for "missing" displays.
pub const fn role_description(role: FileRole) -> &'static str {
    match role {
        FileRole::Flair => "FLAIR image (anat/*_flair.nii[.gz])",
        FileRole::SkullStripped => {
            "Skull stripped image (derivatives/skullstrips/.../anat/*_brain.nii[.gz])"
        }
        FileRole::Segmentation => {
            "Segmentation (manual_masks/*_mask.nii[.gz] or deep_learning_seg/*_seg.nii[.gz])"
        }
        FileRole::PetStatic => "Static PET image (ses-01/pet/*_pet.nii[.gz])",
        FileRole::PetDynamic => "Dynamic PET image (ses-02/pet/*_pet.nii[.gz])",
        FileRole::PetDynamicSidecar => "Dynamic PET sidecar (ses-02/pet/<pet4d>.json)",
        FileRole::TumorMask => {
            "Tumor mask (manual_masks/*_mask.nii[.gz] or deep_learning_seg/*_seg.nii[.gz])"
        }
    }
}

/// `true` iff every required role is present. Roles absent from the map count as missing.
pub fn is_eligible(presence: &BTreeMap<FileRole, bool>) -> bool {
    FileRole::REQUIRED
        .iter()
        .all(|role| presence.get(role).copied().unwrap_or(false))
}

/// Descriptions of the required roles that are not present, in catalog order.
pub fn missing_items(presence: &BTreeMap<FileRole, bool>) -> Vec<&'static str> {
    FileRole::REQUIRED
        .iter()
        .filter(|role| !presence.get(*role).copied().unwrap_or(false))
        .map(|role| role_description(*role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presence(flair: bool, skull: bool, seg: bool) -> BTreeMap<FileRole, bool> {
        BTreeMap::from([
            (FileRole::Flair, flair),
            (FileRole::SkullStripped, skull),
            (FileRole::Segmentation, seg),
        ])
    }

    #[test]
    fn test_eligible_only_when_all_required_present() {
        for flair in [false, true] {
            for skull in [false, true] {
                for seg in [false, true] {
                    assert_eq!(
                        is_eligible(&presence(flair, skull, seg)),
                        flair && skull && seg
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_items_in_catalog_order() {
        let missing = missing_items(&presence(false, true, false));
        assert_eq!(
            missing,
            vec![
                role_description(FileRole::Flair),
                role_description(FileRole::Segmentation)
            ]
        );
    }

    #[test]
    fn test_missing_items_empty_when_eligible() {
        assert!(missing_items(&presence(true, true, true)).is_empty());
    }

    #[test]
    fn test_absent_role_counts_as_missing() {
        let partial = BTreeMap::from([(FileRole::Flair, true), (FileRole::SkullStripped, true)]);
        assert!(!is_eligible(&partial));
        assert_eq!(
            missing_items(&partial),
            vec![role_description(FileRole::Segmentation)]
        );
    }

    #[test]
    fn test_optional_roles_do_not_affect_eligibility() {
        let mut map = presence(true, true, true);
        map.insert(FileRole::PetStatic, false);
        map.insert(FileRole::TumorMask, false);
        assert!(is_eligible(&map));
    }
}
