//! Purpose: Domain vocabulary for organisms, data sources, and cross-references.
//! Exports: `Organism`, `DataSource`, `Xref`.
//! Role: Translate typed vocabulary into the wire strings the service expects.
//! Invariants: Organisms are sent by latin name; data sources by system code.
//! Invariants: Well-known constants never change their system code once published.
use std::borrow::Cow;
use std::fmt;

/// Organisms hosted on WikiPathways.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Organism {
    AnophelesGambiae,
    ArabidopsisThaliana,
    BacillusSubtilis,
    BosTaurus,
    CaenorhabditisElegans,
    CanisFamiliaris,
    DanioRerio,
    DrosophilaMelanogaster,
    EquusCaballus,
    EscherichiaColi,
    GallusGallus,
    GibberellaZeae,
    HomoSapiens,
    MusMusculus,
    MycobacteriumTuberculosis,
    OryzaSativa,
    PanTroglodytes,
    PlasmodiumFalciparum,
    PopulusTrichocarpa,
    RattusNorvegicus,
    SaccharomycesCerevisiae,
    SusScrofa,
    ZeaMays,
}

impl Organism {
    pub const ALL: [Organism; 23] = [
        Organism::AnophelesGambiae,
        Organism::ArabidopsisThaliana,
        Organism::BacillusSubtilis,
        Organism::BosTaurus,
        Organism::CaenorhabditisElegans,
        Organism::CanisFamiliaris,
        Organism::DanioRerio,
        Organism::DrosophilaMelanogaster,
        Organism::EquusCaballus,
        Organism::EscherichiaColi,
        Organism::GallusGallus,
        Organism::GibberellaZeae,
        Organism::HomoSapiens,
        Organism::MusMusculus,
        Organism::MycobacteriumTuberculosis,
        Organism::OryzaSativa,
        Organism::PanTroglodytes,
        Organism::PlasmodiumFalciparum,
        Organism::PopulusTrichocarpa,
        Organism::RattusNorvegicus,
        Organism::SaccharomycesCerevisiae,
        Organism::SusScrofa,
        Organism::ZeaMays,
    ];

    /// Scientific name, the form used on the wire.
    pub fn latin_name(self) -> &'static str {
        self.names().0
    }

    /// Two-letter code used in pathway file names (e.g. `Hs`).
    pub fn short_name(self) -> &'static str {
        self.names().1
    }

    pub fn english_name(self) -> &'static str {
        self.names().2
    }

    pub fn from_latin_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|organism| organism.latin_name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn from_short_name(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|organism| organism.short_name() == code.trim())
    }

    fn names(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Organism::AnophelesGambiae => ("Anopheles gambiae", "Ag", "Mosquito"),
            Organism::ArabidopsisThaliana => ("Arabidopsis thaliana", "At", "Thale cress"),
            Organism::BacillusSubtilis => ("Bacillus subtilis", "Bs", "Bacillus subtilis"),
            Organism::BosTaurus => ("Bos taurus", "Bt", "Cow"),
            Organism::CaenorhabditisElegans => ("Caenorhabditis elegans", "Ce", "Worm"),
            Organism::CanisFamiliaris => ("Canis familiaris", "Cf", "Dog"),
            Organism::DanioRerio => ("Danio rerio", "Dr", "Zebra fish"),
            Organism::DrosophilaMelanogaster => ("Drosophila melanogaster", "Dm", "Fruit fly"),
            Organism::EquusCaballus => ("Equus caballus", "Qc", "Horse"),
            Organism::EscherichiaColi => ("Escherichia coli", "Ec", "E. coli"),
            Organism::GallusGallus => ("Gallus gallus", "Gg", "Chicken"),
            Organism::GibberellaZeae => ("Gibberella zeae", "Gz", "Fusarium graminearum"),
            Organism::HomoSapiens => ("Homo sapiens", "Hs", "Human"),
            Organism::MusMusculus => ("Mus musculus", "Mm", "Mouse"),
            Organism::MycobacteriumTuberculosis => {
                ("Mycobacterium tuberculosis", "Mx", "Tuberculosis")
            }
            Organism::OryzaSativa => ("Oryza sativa", "Oj", "Rice"),
            Organism::PanTroglodytes => ("Pan troglodytes", "Pt", "Chimpanzee"),
            Organism::PlasmodiumFalciparum => ("Plasmodium falciparum", "Pf", "Malaria parasite"),
            Organism::PopulusTrichocarpa => ("Populus trichocarpa", "Pi", "Black cottonwood"),
            Organism::RattusNorvegicus => ("Rattus norvegicus", "Rn", "Rat"),
            Organism::SaccharomycesCerevisiae => ("Saccharomyces cerevisiae", "Sc", "Yeast"),
            Organism::SusScrofa => ("Sus scrofa", "Ss", "Pig"),
            Organism::ZeaMays => ("Zea mays", "Zm", "Maize"),
        }
    }
}

impl fmt::Display for Organism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.latin_name())
    }
}

/// A database system that identifiers belong to, keyed by its system code.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DataSource {
    full_name: Cow<'static, str>,
    system_code: Cow<'static, str>,
}

impl DataSource {
    pub const ENTREZ_GENE: DataSource = DataSource::known("Entrez Gene", "L");
    pub const ENSEMBL: DataSource = DataSource::known("Ensembl", "En");
    pub const UNIPROT: DataSource = DataSource::known("Uniprot-TrEMBL", "S");
    pub const HGNC: DataSource = DataSource::known("HGNC", "H");
    pub const REFSEQ: DataSource = DataSource::known("RefSeq", "Q");
    pub const MGI: DataSource = DataSource::known("MGI", "M");
    pub const RGD: DataSource = DataSource::known("RGD", "R");
    pub const ZFIN: DataSource = DataSource::known("ZFIN", "Z");
    pub const FLYBASE: DataSource = DataSource::known("FlyBase", "F");
    pub const WORMBASE: DataSource = DataSource::known("WormBase", "W");
    pub const SGD: DataSource = DataSource::known("SGD", "D");
    pub const TAIR: DataSource = DataSource::known("TAIR", "A");
    pub const AFFY: DataSource = DataSource::known("Affy", "X");
    pub const MIRBASE: DataSource = DataSource::known("miRBase Sequence", "Mb");
    pub const HMDB: DataSource = DataSource::known("HMDB", "Ch");
    pub const CHEBI: DataSource = DataSource::known("ChEBI", "Ce");
    pub const CAS: DataSource = DataSource::known("CAS", "Ca");
    pub const KEGG_COMPOUND: DataSource = DataSource::known("KEGG Compound", "Ck");
    pub const PUBCHEM_COMPOUND: DataSource = DataSource::known("PubChem-compound", "Cpc");
    pub const CHEMSPIDER: DataSource = DataSource::known("ChemSpider", "Cs");
    pub const WIKIDATA: DataSource = DataSource::known("Wikidata", "Wd");
    pub const REACTOME: DataSource = DataSource::known("Reactome", "Re");
    pub const RHEA: DataSource = DataSource::known("Rhea", "Rh");
    pub const GENE_ONTOLOGY: DataSource = DataSource::known("GeneOntology", "T");

    const KNOWN: [DataSource; 24] = [
        Self::ENTREZ_GENE,
        Self::ENSEMBL,
        Self::UNIPROT,
        Self::HGNC,
        Self::REFSEQ,
        Self::MGI,
        Self::RGD,
        Self::ZFIN,
        Self::FLYBASE,
        Self::WORMBASE,
        Self::SGD,
        Self::TAIR,
        Self::AFFY,
        Self::MIRBASE,
        Self::HMDB,
        Self::CHEBI,
        Self::CAS,
        Self::KEGG_COMPOUND,
        Self::PUBCHEM_COMPOUND,
        Self::CHEMSPIDER,
        Self::WIKIDATA,
        Self::REACTOME,
        Self::RHEA,
        Self::GENE_ONTOLOGY,
    ];

    const fn known(full_name: &'static str, system_code: &'static str) -> Self {
        Self {
            full_name: Cow::Borrowed(full_name),
            system_code: Cow::Borrowed(system_code),
        }
    }

    pub fn new(full_name: impl Into<String>, system_code: impl Into<String>) -> Self {
        Self {
            full_name: Cow::Owned(full_name.into()),
            system_code: Cow::Owned(system_code.into()),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn system_code(&self) -> &str {
        &self.system_code
    }

    pub fn from_system_code(code: &str) -> Option<Self> {
        Self::KNOWN
            .into_iter()
            .find(|source| source.system_code() == code)
    }

    /// Lookup by the name GPML stores in `Xref/@Database`.
    pub fn from_full_name(name: &str) -> Option<Self> {
        Self::KNOWN
            .into_iter()
            .find(|source| source.full_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// An identifier, optionally qualified by the data source it belongs to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Xref {
    id: String,
    data_source: Option<DataSource>,
}

impl Xref {
    pub fn new(id: impl Into<String>, data_source: Option<DataSource>) -> Self {
        Self {
            id: id.into(),
            data_source,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_source(&self) -> Option<&DataSource> {
        self.data_source.as_ref()
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data_source {
            Some(source) => write!(f, "{}:{}", source.system_code(), self.id),
            None => f.write_str(&self.id),
        }
    }
}
