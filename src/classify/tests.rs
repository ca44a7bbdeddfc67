use crate::classify::{
    classify_regions, combination, lump, rank_combinations, Category, ClassMap, RawClasses,
    LUMP_THRESHOLD, NRP_POLYKETIDE, OTHER_HYBRIDS,
};
use crate::dataset::regions::BgcRegion;
use color_eyre::eyre::{Report, Result};
use std::str::FromStr;

fn class_map() -> ClassMap {
    let mut map = ClassMap::new();
    map.insert("NRPS", Category::Nrp);
    map.insert("T1PKS", Category::Polyketide);
    map.insert("terpene", Category::Terpene);
    map.insert("lanthipeptide", Category::Ripp);
    map
}

fn region(combination: &str) -> BgcRegion {
    BgcRegion { combination: combination.to_string(), ..Default::default() }
}

#[test]
fn raw_classes_single() -> Result<(), Report> {
    let observed = RawClasses::from_str("terpene")?;
    assert_eq!(observed, RawClasses::Single("terpene".to_string()));
    assert_eq!(observed.names(), vec!["terpene"]);
    Ok(())
}

#[test]
fn raw_classes_list() -> Result<(), Report> {
    let observed = RawClasses::from_str(r#"["NRPS", "T1PKS"]"#)?;
    assert_eq!(
        observed,
        RawClasses::List(vec!["NRPS".to_string(), "T1PKS".to_string()])
    );
    assert_eq!(observed.names(), vec!["NRPS", "T1PKS"]);
    Ok(())
}

#[test]
fn raw_classes_invalid_list() -> Result<(), Report> {
    assert!(RawClasses::from_str(r#"["NRPS", "#).is_err());
    Ok(())
}

#[test]
fn classify_is_deterministic() -> Result<(), Report> {
    let map = class_map();
    let raw = RawClasses::from_str(r#"["NRPS", "T1PKS", "terpene"]"#)?;

    let first = combination(&map.classify(&raw)?);
    let second = combination(&map.classify(&raw)?);
    assert_eq!(first, second);
    assert_eq!(first, "NRP, Polyketide, Terpene");
    Ok(())
}

#[test]
fn classify_is_order_insensitive() -> Result<(), Report> {
    let map = class_map();
    let forward = RawClasses::from_str(r#"["NRPS", "T1PKS"]"#)?;
    let backward = RawClasses::from_str(r#"["T1PKS", "NRPS"]"#)?;

    let forward = combination(&map.classify(&forward)?);
    let backward = combination(&map.classify(&backward)?);
    assert_eq!(forward, backward);
    assert_eq!(forward, NRP_POLYKETIDE);
    Ok(())
}

#[test]
fn classify_deduplicates() -> Result<(), Report> {
    let map = class_map();
    let raw = RawClasses::from_str(r#"["NRPS", "NRPS"]"#)?;
    assert_eq!(combination(&map.classify(&raw)?), "NRP");
    Ok(())
}

#[test]
fn unknown_class_is_fatal() -> Result<(), Report> {
    let map = class_map();
    let raw = RawClasses::from_str("hglE-KS")?;
    assert!(map.classify(&raw).is_err());
    Ok(())
}

#[test]
fn category_labels_round_trip() -> Result<(), Report> {
    for name in ["Alkaloid", "NRP", "Other", "Polyketide", "RiPP", "Saccharide", "Terpene"] {
        assert_eq!(Category::from_str(name)?.to_string(), name);
    }
    assert!(Category::from_str("Peptide").is_err());
    Ok(())
}

#[test]
fn lump_is_idempotent() -> Result<(), Report> {
    let once = lump("RiPP, Terpene", 3, LUMP_THRESHOLD);
    let twice = lump(&once, 3, LUMP_THRESHOLD);
    assert_eq!(once, OTHER_HYBRIDS);
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn lump_keeps_nrp_polyketide() -> Result<(), Report> {
    assert_eq!(lump(NRP_POLYKETIDE, 0, LUMP_THRESHOLD), NRP_POLYKETIDE);
    assert_eq!(lump(NRP_POLYKETIDE, 1000, LUMP_THRESHOLD), NRP_POLYKETIDE);
    Ok(())
}

#[test]
fn lump_threshold_boundary() -> Result<(), Report> {
    assert_eq!(lump("Terpene", LUMP_THRESHOLD, LUMP_THRESHOLD), "Terpene");
    assert_eq!(lump("Terpene", LUMP_THRESHOLD - 1, LUMP_THRESHOLD), OTHER_HYBRIDS);
    Ok(())
}

#[test]
fn classify_regions_attaches_combinations() -> Result<(), Report> {
    let map = class_map();
    let mut raw = BgcRegion::default();
    raw.classes = RawClasses::from_str(r#"["T1PKS", "NRPS"]"#)?;

    let observed = classify_regions(&[raw], &map)?;
    assert_eq!(observed[0].combination, NRP_POLYKETIDE);
    assert_eq!(observed[0].categories, vec![Category::Nrp, Category::Polyketide]);
    Ok(())
}

#[test]
fn rank_combinations_descending() -> Result<(), Report> {
    let regions = vec![
        region("Terpene"),
        region("NRP"),
        region("Terpene"),
        region("RiPP"),
        region("Terpene"),
        region("NRP"),
    ];

    let observed = rank_combinations(&regions);
    let expected = vec![
        ("Terpene".to_string(), 3),
        ("NRP".to_string(), 2),
        ("RiPP".to_string(), 1),
    ];
    assert_eq!(expected, observed);
    Ok(())
}
