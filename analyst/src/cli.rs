use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// Numeric arguments are taken as text and validated by the controller, so a
// typo is reported as an input error instead of a usage dump.
#[derive(Debug, Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Query cellular cell records and export them to KMZ")]
pub struct Cli {
    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Look up cells by exact CGI
    Cgi(CgiArgs),
    /// Cells around a reference cell
    Neighbors(NeighborArgs),
    /// Cells within a radius of a point
    Circle(CircleArgs),
    /// Cells inside a latitude/longitude rectangle
    Rectangle(RectangleArgs),
    /// Cells in a county, optionally checked against its district
    Region(RegionArgs),
    /// Cells with a LAC/TAC value
    LacTac(ValueArgs),
    /// Cells hosted by an eNB/gNB
    EnbGnb(ValueArgs),
    /// Cells on a frequency band
    Band(ValueArgs),
    /// Export timestamped CSV observations to KMZ
    CsvExport(CsvExportArgs),
    /// List values for filter inputs
    #[clap(subcommand)]
    List(ListCmd),
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Technology to keep (2G, 3G, 4G, 5G or a numeric code). Repeatable or comma separated
    #[arg(long = "technology", value_delimiter = ',')]
    pub technologies: Vec<String>,
    /// Operator brand to keep. Repeatable or comma separated
    #[arg(long = "operator", value_delimiter = ',')]
    pub operators: Vec<String>,
    /// Earliest creation date, YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// Latest creation date, YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct ExportArgs {
    /// Also write the results to this KMZ file
    #[arg(long)]
    pub kmz: Option<PathBuf>,
    /// Use the simplified polygons in the KMZ
    #[arg(long)]
    pub short_polygons: bool,
}

#[derive(Debug, Args)]
pub struct CgiArgs {
    #[arg(required = true)]
    pub cgis: Vec<String>,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct NeighborArgs {
    #[arg(long)]
    pub cgi: String,
    #[arg(long)]
    pub radius_km: String,
    /// Only cells of the reference cell's operator
    #[arg(long)]
    pub same_network: bool,
    #[clap(flatten)]
    pub filters: FilterArgs,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct CircleArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: String,
    #[arg(long)]
    pub radius_km: String,
    #[clap(flatten)]
    pub filters: FilterArgs,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct RectangleArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat1: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lon1: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat2: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lon2: String,
    #[clap(flatten)]
    pub filters: FilterArgs,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct RegionArgs {
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub county: String,
    #[clap(flatten)]
    pub filters: FilterArgs,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    #[clap(flatten)]
    pub filters: FilterArgs,
    #[clap(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args)]
pub struct CsvExportArgs {
    /// CSV with a timestamp,cgi,color,target,notes header
    pub csv: PathBuf,
    #[arg(long, short)]
    pub output: PathBuf,
    #[arg(long)]
    pub short_polygons: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ListCmd {
    Districts,
    Counties {
        #[arg(long)]
        district: Option<String>,
    },
    Operators,
    Bands,
}
