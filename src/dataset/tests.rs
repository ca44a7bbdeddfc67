use crate::classify::RawClasses;
use crate::dataset::{Dataset, UNCLASSIFIED};
use color_eyre::eyre::{Report, Result};
use std::path::Path;
use tempfile::TempDir;

/// Write a small but complete input directory.
fn write_fixture(dir: &Path) -> Result<(), Report> {
    std::fs::write(
        dir.join("class_categories.tsv"),
        "class\tcategory\nNRPS\tNRP\nT1PKS\tPolyketide\nterpene\tTerpene\n",
    )?;
    std::fs::write(
        dir.join("taxonomy.tsv"),
        "accession\ttaxid\tsuperkingdom\tphylum\tclass\torder\tfamily\tgenus\tspecies\n\
         GCF_A\t1117\tBacteria\tCyanobacteriota\tCyanophyceae\tNostocales\tNostocaceae\tNostoc\tNostoc punctiforme\n\
         GCF_B\t1118\tBacteria\tCyanobacteriota\tCyanophyceae\tNostocales\tNostocaceae\t\tuncultured cyanobacterium\n\
         GCF_Z\t1119\tBacteria\tCyanobacteriota\tCyanophyceae\tNostocales\tNostocaceae\tAnabaena\tAnabaena cylindrica\n",
    )?;
    std::fs::write(
        dir.join("regions.tsv"),
        "accession\tregion_length\tscaffold_count\tcontig_edge\tclasses\tgenus\n\
         GCF_A\t25000\t1\tFalse\tNRPS\tWrongGenus\n\
         GCF_B\t18000\t4\tTrue\t[\"NRPS\", \"T1PKS\"]\t\n\
         GCF_X\t9000\t12\tFalse\tterpene\t\n",
    )?;
    std::fs::write(
        dir.join("assembly_levels.tsv"),
        "accession\tassembly_level\nGCF_A\tComplete Genome\nGCF_B\tScaffold\nGCF_X\tContig\n",
    )?;
    std::fs::write(dir.join("zero_hits.txt"), "GCF_Z\nGCF_Y\n")?;
    std::fs::write(dir.join("genus_genomes.tsv"), "genus\tgenomes\nNostoc\t12\nAnabaena\t7\n")?;
    std::fs::write(dir.join("gcf_clusters.tsv"), "accession\tgcf\nGCF_A\tFAM_1\nGCF_B\tFAM_1\n")?;
    Ok(())
}

#[test]
fn load_row_counts() -> Result<(), Report> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;

    let dataset = Dataset::load(dir.path())?;
    assert_eq!(dataset.class_map.len(), 3);
    assert_eq!(dataset.taxonomy.len(), 3);
    assert_eq!(dataset.assemblies.len(), 3);
    assert_eq!(dataset.regions.len(), 3);
    assert_eq!(dataset.zero_hits.len(), 2);
    assert_eq!(dataset.genus_genomes.len(), 2);
    assert_eq!(dataset.gcf_clusters.len(), 2);
    Ok(())
}

#[test]
fn taxonomy_join_is_authoritative() -> Result<(), Report> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;

    let dataset = Dataset::load(dir.path())?;
    // the taxonomy genus wins over the denormalized region column
    assert_eq!(dataset.regions[0].genus, "Nostoc");
    // empty genus rank and empty region column resolve to the sentinel
    assert_eq!(dataset.regions[1].genus, UNCLASSIFIED);
    // accession entirely missing from taxonomy resolves to the sentinel
    assert_eq!(dataset.regions[2].genus, UNCLASSIFIED);
    Ok(())
}

#[test]
fn region_cells_are_typed() -> Result<(), Report> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;

    let dataset = Dataset::load(dir.path())?;
    assert_eq!(dataset.regions[0].length, 25_000);
    assert_eq!(dataset.regions[1].scaffolds, 4);
    assert!(dataset.regions[1].contig_edge);
    assert_eq!(
        dataset.regions[1].classes,
        RawClasses::List(vec!["NRPS".to_string(), "T1PKS".to_string()])
    );
    Ok(())
}

#[test]
fn assembly_levels_joined_with_taxonomy() -> Result<(), Report> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;

    let dataset = Dataset::load(dir.path())?;
    let a = &dataset.assemblies["GCF_A"];
    assert!(a.level.is_high_quality());
    assert_eq!(a.taxid, Some(1117));
    assert_eq!(a.lineage.genus, "Nostoc");

    let x = &dataset.assemblies["GCF_X"];
    assert!(!x.level.is_high_quality());
    assert_eq!(x.taxid, None);
    Ok(())
}

#[test]
fn zero_hits_counted_per_genus() -> Result<(), Report> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;

    let dataset = Dataset::load(dir.path())?;
    let counts = dataset.zero_hit_genus_counts();
    // GCF_Z resolves through the taxonomy join
    assert_eq!(counts["Anabaena"], 1);
    // GCF_Y is unknown and counts under the sentinel
    assert_eq!(counts[UNCLASSIFIED], 1);
    Ok(())
}

#[test]
fn missing_input_is_an_error() -> Result<(), Report> {
    let dir = TempDir::new()?;
    assert!(Dataset::load(dir.path()).is_err());
    Ok(())
}
