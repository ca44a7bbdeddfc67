use crate::dataset::regions::BgcRegion;
use crate::dataset::taxonomy::{AssemblyLevel, GenomeAssembly};
use crate::filter::high_quality;
use color_eyre::eyre::{Report, Result};
use std::collections::BTreeMap;

fn assembly(accession: &str, level: AssemblyLevel) -> (String, GenomeAssembly) {
    let assembly =
        GenomeAssembly { accession: accession.to_string(), level, ..Default::default() };
    (accession.to_string(), assembly)
}

fn region(accession: &str, length: u64) -> BgcRegion {
    BgcRegion { accession: accession.to_string(), length, ..Default::default() }
}

#[test]
fn keeps_complete_and_chromosome() -> Result<(), Report> {
    let assemblies: BTreeMap<String, GenomeAssembly> = [
        assembly("GCF_A", AssemblyLevel::Complete),
        assembly("GCF_B", AssemblyLevel::Chromosome),
        assembly("GCF_C", AssemblyLevel::Scaffold),
        assembly("GCF_D", AssemblyLevel::Contig),
    ]
    .into_iter()
    .collect();

    let regions = vec![
        region("GCF_A", 10_000),
        region("GCF_B", 20_000),
        region("GCF_C", 30_000),
        region("GCF_D", 40_000),
    ];

    let observed = high_quality(&regions, &assemblies);
    let accessions = observed.iter().map(|r| r.accession.as_str()).collect::<Vec<_>>();
    assert_eq!(accessions, vec!["GCF_A", "GCF_B"]);
    Ok(())
}

#[test]
fn filter_is_a_subset() -> Result<(), Report> {
    let assemblies: BTreeMap<String, GenomeAssembly> =
        [assembly("GCF_A", AssemblyLevel::Complete)].into_iter().collect();

    let regions =
        vec![region("GCF_A", 10_000), region("GCF_A", 15_000), region("GCF_B", 20_000)];

    let observed = high_quality(&regions, &assemblies);
    // every retained record exists, unchanged, in the unfiltered set
    assert!(observed.iter().all(|r| regions.contains(r)));
    assert_eq!(observed.len(), 2);
    Ok(())
}

#[test]
fn missing_accession_is_excluded() -> Result<(), Report> {
    let assemblies: BTreeMap<String, GenomeAssembly> = BTreeMap::new();
    let regions = vec![region("GCF_A", 10_000)];

    let observed = high_quality(&regions, &assemblies);
    assert!(observed.is_empty());
    Ok(())
}
