use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "datatable",
    version,
    about = "fetch, search, page and export a remote record list",
    long_about = "datatable fetches a JSON array of records once, filters it by title, shows one page of it as a table and exports exactly that page to PDF, Excel or CSV.\n\nExamples:\n  datatable\n  datatable -u http://localhost:5000/data -s alpha -n 5 -p 2\n  datatable --export all --output-dir ./exports\n  datatable --interactive\n\nTip: Use --init-config to write a commented config file you can edit."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        visible_alias = "nc",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'u',
        long = "url",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Input",
        help = "Endpoint returning the JSON record array (default http://localhost:5000/data)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'i',
        long = "input",
        visible_alias = "input-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Read the record array from a local JSON file instead of the endpoint."
    )]
    pub input: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.datatable/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TERM",
        help_heading = "View",
        help = "Only show records whose title contains TERM (case-insensitive)."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "View",
        help = "Page to show, starting at 1."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'n',
        long = "per-page",
        visible_alias = "items-per-page",
        value_name = "N",
        help_heading = "View",
        help = "Records per page: 5, 10, 15 or 20."
    )]
    pub per_page: Option<usize>,

    #[arg(
        long = "reset-page-on-search",
        help_heading = "View",
        help = "Go back to page 1 whenever the search term changes in interactive mode."
    )]
    pub reset_page_on_search: bool,

    #[arg(
        short = 'I',
        long = "interactive",
        help_heading = "View",
        help = "Read search/page/export commands from stdin after the first render."
    )]
    pub interactive: bool,

    #[arg(
        short = 'e',
        long = "export",
        value_name = "FORMAT",
        action = ArgAction::Append,
        help_heading = "Export",
        help = "Export the visible page: pdf, xlsx, csv or all (repeatable, comma-separated)."
    )]
    pub export: Vec<String>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help_heading = "Export",
        help = "Directory that receives data.pdf / data.xlsx / data.csv."
    )]
    pub output_dir: Option<String>,

    #[arg(
        long = "date-format",
        value_name = "PATTERN",
        help_heading = "Export",
        help = "strftime pattern for the Date column (default %-m/%-d/%Y)."
    )]
    pub date_format: Option<String>,

    #[arg(
        long = "utc",
        help_heading = "Export",
        help = "Render dates in UTC instead of the local timezone."
    )]
    pub utc: bool,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,
}
