//! Command line arguments and dispatch onto the engine's views.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;
use traffic_analytics::{render_markdown, AnalyticsEngine, IfrMovement, Result};
use traffic_domain::{DatasetKind, FilterParams, Table};

#[derive(Parser, Debug)]
#[command(name = "traffic-dash", version)]
#[command(about = "European air traffic dashboard views")]
pub struct Args {
    /// Directory holding the source CSV files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// First day of the window (YYYY-MM-DD), inclusive
    #[arg(long, global = true)]
    pub start: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD), inclusive
    #[arg(long, global = true)]
    pub end: Option<NaiveDate>,

    /// Restrict a column to values, as COLUMN=VALUE[,VALUE...]
    #[arg(long = "select", global = true)]
    pub selections: Vec<Selection>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Length of ranking views
    #[arg(long, global = true)]
    pub top_n: Option<usize>,

    /// Moving-average window in days
    #[arg(long, global = true)]
    pub window: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Date window and selections shared by every view.
    #[must_use]
    pub fn filter_params(&self) -> FilterParams {
        self.selections.iter().fold(
            FilterParams::new().with_dates(self.start, self.end),
            |params, selection| params.with_selection(&selection.column, &selection.values),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}

/// One `--select` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub column: String,
    pub values: Vec<String>,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (column, values) = s
            .split_once('=')
            .ok_or_else(|| format!("expected COLUMN=VALUE[,VALUE...], got '{s}'"))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(format!("missing column name in '{s}'"));
        }
        Ok(Self {
            column: column.to_string(),
            values: values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

/// Movement direction for the airport views; none or both mean totals.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct MovementArgs {
    /// arrival | departure, repeatable
    #[arg(long = "movement")]
    pub movements: Vec<IfrMovement>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// States with the most flights
    TopStates,
    /// Mean flights per state with ISO codes
    StatesMap,
    /// Mean flights per state
    StateTraffic,
    /// Daily network flights against 2019 and the previous year
    TrafficVariations,
    /// Weekly means with seasons
    WeeklyVariations,
    /// Mean flights per area control center
    AreaCenters,
    /// Daily airport movements with moving averages
    NumberOfFlights(MovementArgs),
    /// Airports with the most movements
    TopAirports(MovementArgs),
    /// Daily movements per state
    DailyAveragePerState(MovementArgs),
    /// Mean daily movements per airport
    DailyAveragePerAirport(MovementArgs),
    /// Mean daily movements per year, ignoring the date window
    AveragePerYear(MovementArgs),
    /// Mean daily movements per month
    AveragePerMonth(MovementArgs),
    /// Daily operator flights against 2019 and the previous year
    OperatorVariations,
    /// Operators with the most flights
    TopOperators,
    /// Mean flights per operator
    OperatorTraffic,
    /// Monthly operator means against 2019
    OperatorMonthly,
    /// Yearly operator means including 2019
    OperatorYearly,
    /// Values offered for a column after the current selections
    Options {
        /// states | area-centers | airports | operators
        #[arg(long)]
        dataset: DatasetKind,

        /// Column to list, the dataset's entity column by default
        #[arg(long)]
        column: Option<String>,
    },
    /// Headline report
    Report,
}

/// Run one command and render its result.
pub fn run(
    engine: &AnalyticsEngine,
    command: &Command,
    params: &FilterParams,
    format: OutputFormat,
) -> Result<String> {
    let table = match command {
        Command::TopStates => engine.top_ten_states(params)?,
        Command::StatesMap => engine.states_map(params)?,
        Command::StateTraffic => engine.state_traffic(params)?,
        Command::TrafficVariations => engine.traffic_variations(params)?,
        Command::WeeklyVariations => engine.weekly_variations(params)?,
        Command::AreaCenters => engine.area_centers_data(params)?,
        Command::NumberOfFlights(m) => engine.number_of_flights(params, &m.movements)?,
        Command::TopAirports(m) => engine.top_flight_airports(params, &m.movements)?,
        Command::DailyAveragePerState(m) => {
            engine.daily_average_per_state(params, &m.movements)?
        }
        Command::DailyAveragePerAirport(m) => {
            engine.daily_average_per_airport(params, &m.movements)?
        }
        Command::AveragePerYear(m) => engine.average_per_year(params, &m.movements)?,
        Command::AveragePerMonth(m) => engine.average_per_month(params, &m.movements)?,
        Command::OperatorVariations => engine.operator_traffic_variations(params)?,
        Command::TopOperators => engine.top_ten_operators(params)?,
        Command::OperatorTraffic => engine.operator_traffic(params)?,
        Command::OperatorMonthly => engine.operator_monthly(params)?,
        Command::OperatorYearly => engine.operator_yearly(params)?,
        Command::Options { dataset, column } => {
            let column = column
                .as_deref()
                .unwrap_or_else(|| dataset.entity_column());
            let options = engine.entity_options(*dataset, column, params.selectors())?;
            return render_options(&options, format);
        }
        Command::Report => {
            return match format {
                OutputFormat::Json => engine.generate_report_json(params),
                OutputFormat::Markdown => engine.generate_report_markdown(params),
            };
        }
    };
    render_table(&table, format)
}

fn render_table(table: &Table, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Markdown => Ok(render_markdown(table)),
    }
}

fn render_options(options: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(options)?),
        OutputFormat::Markdown => Ok(options.iter().map(|o| format!("- {o}\n")).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_domain::columns as c;

    #[test]
    fn test_selection_parsing() {
        let selection: Selection = "Entity=Spain, France,".parse().unwrap();
        assert_eq!(selection.column, "Entity");
        assert_eq!(selection.values, vec!["Spain", "France"]);

        let empty: Selection = "Entity=".parse().unwrap();
        assert!(empty.values.is_empty());

        assert!("Spain".parse::<Selection>().is_err());
        assert!("=Spain".parse::<Selection>().is_err());
    }

    #[test]
    fn test_global_flags_build_params() {
        let args = Args::try_parse_from([
            "traffic-dash",
            "top-states",
            "--start",
            "2021-01-01",
            "--end",
            "2021-01-31",
            "--select",
            "Entity=Spain,France",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::TopStates));
        assert_eq!(args.format, OutputFormat::Json);
        let params = args.filter_params();
        assert_eq!(params.start_date(), NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(params.end_date(), NaiveDate::from_ymd_opt(2021, 1, 31));
        assert_eq!(params.selection(c::ENTITY).unwrap().len(), 2);
    }

    #[test]
    fn test_movement_and_options_arguments() {
        let args = Args::try_parse_from([
            "traffic-dash",
            "number-of-flights",
            "--movement",
            "arrival",
        ])
        .unwrap();
        match args.command {
            Command::NumberOfFlights(m) => assert_eq!(m.movements, vec![IfrMovement::Arrival]),
            other => panic!("unexpected command: {other:?}"),
        }

        let args =
            Args::try_parse_from(["traffic-dash", "options", "--dataset", "area-centers"]).unwrap();
        match args.command {
            Command::Options { dataset, column } => {
                assert_eq!(dataset, DatasetKind::AreaCenters);
                assert!(column.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Args::try_parse_from(["traffic-dash", "report", "--start", "01/02/2021"]).is_err());
    }
}
