use crate::classify::{Category, ClassMap, RawClasses, OTHER_HYBRIDS};
use crate::dataset::regions::BgcRegion;
use crate::plot::{combination_counts, hexbin, lumped_counts, PlotConfig};
use crate::classify::classify_regions;
use color_eyre::eyre::{Report, Result};
use std::str::FromStr;
use tempfile::TempDir;

fn region(combination: &str) -> BgcRegion {
    BgcRegion { combination: combination.to_string(), ..Default::default() }
}

#[test]
fn hexbin_preserves_totals() -> Result<(), Report> {
    let points = (0..10)
        .flat_map(|x| (0..10).map(move |y| (x as f64, y as f64)))
        .collect::<Vec<_>>();

    let bins = hexbin::bin(&points, 8, (0.0, 10.0), (0.0, 10.0));
    let total: usize = bins.iter().map(|bin| bin.count).sum();
    assert_eq!(total, points.len());
    Ok(())
}

#[test]
fn hexbin_identical_points_share_a_bin() -> Result<(), Report> {
    let points = vec![(3.0, 4.0); 17];
    let bins = hexbin::bin(&points, 8, (0.0, 10.0), (0.0, 10.0));
    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0].count, 17);
    Ok(())
}

#[test]
fn hexbin_empty_input() -> Result<(), Report> {
    let bins = hexbin::bin(&[], 8, (0.0, 10.0), (0.0, 10.0));
    assert!(bins.is_empty());
    Ok(())
}

#[test]
fn hexbin_vertices_are_hexagons() -> Result<(), Report> {
    let bins = hexbin::bin(&[(5.0, 5.0)], 8, (0.0, 10.0), (0.0, 10.0));
    assert_eq!(bins[0].vertices().len(), 6);
    Ok(())
}

#[test]
fn lumped_counts_collapse_rare_combinations() -> Result<(), Report> {
    let mut regions = Vec::new();
    regions.extend((0..5).map(|_| region("Terpene")));
    regions.extend((0..2).map(|_| region("RiPP")));
    regions.push(region("NRP, Polyketide"));

    let observed = lumped_counts(&regions, 5);
    let expected = vec![
        ("Terpene".to_string(), 5),
        (OTHER_HYBRIDS.to_string(), 2),
        ("NRP, Polyketide".to_string(), 1),
    ];
    assert_eq!(expected, observed);
    Ok(())
}

#[test]
fn combination_chart_written_in_both_formats() -> Result<(), Report> {
    let mut map = ClassMap::new();
    map.insert("NRPS", Category::Nrp);
    map.insert("terpene", Category::Terpene);

    let mut regions = Vec::new();
    for classes in ["NRPS", "terpene", "terpene"] {
        let mut raw = BgcRegion { length: 20_000, ..Default::default() };
        raw.classes = RawClasses::from_str(classes)?;
        regions.push(raw);
    }
    let regions = classify_regions(&regions, &map)?;

    let dir = TempDir::new()?;
    let config = PlotConfig { width: 400, height: 300, ..Default::default() };
    let paths = combination_counts(&regions, 1, &config, dir.path())?;

    assert_eq!(paths.len(), 2);
    for path in paths {
        assert!(path.exists());
        assert!(std::fs::metadata(&path)?.len() > 0);
    }
    Ok(())
}
