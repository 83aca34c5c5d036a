use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use doclist_core::{
    ConsultationMode, FetchError, LoadStatus, Presenter, ProviderRecord, SortKey, ViewModel,
    ViewState,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored text, one block per doctor
    Text,
    /// Compact table
    Table,
    /// JSON document with the view state and the matching doctors
    Json,
}

/// JSON shape of one rendered frame
#[derive(Debug, Serialize)]
pub struct ListOutput<'a> {
    pub query: &'a str,
    pub state: &'a ViewState,
    pub total: usize,
    pub count: usize,
    pub doctors: &'a [ProviderRecord],
}

impl<'a> From<ViewModel<'a>> for ListOutput<'a> {
    fn from(view: ViewModel<'a>) -> Self {
        Self {
            query: view.query,
            state: view.state,
            total: view.total,
            count: view.visible.len(),
            doctors: view.visible,
        }
    }
}

/// Presenter writing frames to the terminal
///
/// When `live` is false frames are not printed; the caller prints the final
/// frame itself once every event has been processed.
pub struct TerminalPresenter {
    format: OutputFormat,
    live: bool,
    failure: Option<FetchError>,
}

impl TerminalPresenter {
    pub fn live(format: OutputFormat) -> Self {
        Self {
            format,
            live: true,
            failure: None,
        }
    }

    pub fn deferred(format: OutputFormat) -> Self {
        Self {
            format,
            live: false,
            failure: None,
        }
    }

    #[cfg(test)]
    fn failure(&self) -> Option<&FetchError> {
        self.failure.as_ref()
    }

    pub fn print(&self, view: ViewModel<'_>) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", format_list_json(&ListOutput::from(view))?),
            OutputFormat::Text => print!("{}", format_list_text(view)),
            OutputFormat::Table => {
                print!("{}", format_header(view));
                format_list_table(view.visible).printstd();
                print!("{}", format_footer(view));
            }
        }
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, view: ViewModel<'_>) {
        if !self.live || self.failure.is_some() {
            return;
        }
        if let Err(err) = self.print(view) {
            eprintln!("{}", format!("Failed to render: {err}").red());
        }
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        if self.live {
            eprintln!("{}", format_fetch_error(error));
        }
        self.failure = Some(error.clone());
    }
}

pub fn format_list_json(output: &ListOutput<'_>) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

pub fn format_fetch_error(error: &FetchError) -> String {
    format!("Error loading doctors: {error}").red().bold().to_string()
}

pub fn mode_label(mode: ConsultationMode) -> &'static str {
    match mode {
        ConsultationMode::None => "Any",
        ConsultationMode::Video => "Video Consult",
        ConsultationMode::InClinic => "In Clinic",
    }
}

pub fn sort_label(sort: SortKey) -> &'static str {
    match sort {
        SortKey::None => "Catalog order",
        SortKey::Fee => "Fees (Ascending)",
        SortKey::Experience => "Experience (Descending)",
    }
}

/// One-line summary of the active filters
pub fn format_filters(state: &ViewState) -> String {
    let search = if state.search_term.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", state.search_term)
    };
    let specialties = if state.specialties.is_empty() {
        "Any".to_string()
    } else {
        state
            .specialties
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{}: {} | {}: {} | {}: {} | {}: {}",
        "Search".green(),
        search.bright_white(),
        "Mode".green(),
        mode_label(state.consultation_mode).bright_white(),
        "Specialties".green(),
        specialties.bright_white(),
        "Sort".green(),
        sort_label(state.sort_key).bright_white()
    )
}

fn format_header(view: ViewModel<'_>) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("DOCTORS ({} of {})", view.visible.len(), view.total)
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", format_filters(view.state)));

    if matches!(view.status, LoadStatus::Loading) {
        result.push_str(&format!("\n{}\n", "Loading doctors...".yellow()));
    }

    result
}

fn format_footer(view: ViewModel<'_>) -> String {
    format!(
        "\n{}: {}\n",
        "URL".green(),
        format!("?{}", view.query).cyan().underline()
    )
}

/// Colored text rendering of a frame
pub fn format_list_text(view: ViewModel<'_>) -> String {
    let mut result = format_header(view);

    if view.visible.is_empty() && matches!(view.status, LoadStatus::Ready) {
        result.push_str(&format!(
            "\n{}\n",
            "No doctors found matching your criteria.".yellow()
        ));
    }

    for (idx, doctor) in view.visible.iter().enumerate() {
        result.push_str(&format!(
            "\n{} {}\n",
            format!("[{}]", idx + 1).yellow().bold(),
            doctor
                .name
                .as_deref()
                .unwrap_or("(No name)")
                .white()
                .bold()
        ));

        let specialties = doctor.specialty_names().collect::<Vec<_>>().join(", ");
        if !specialties.is_empty() {
            result.push_str(&format!(
                "    {}: {}\n",
                "Specialty".green(),
                specialties.bright_white()
            ));
        }

        result.push_str(&format!(
            "    {}: {} | {}: {} | {}: {}\n",
            "Experience".green(),
            doctor
                .experience
                .as_deref()
                .unwrap_or("unknown")
                .bright_yellow(),
            "Fees".green(),
            doctor.fees.as_deref().unwrap_or("unknown").bright_magenta(),
            "Consult".green(),
            consult_label(doctor).bright_white()
        ));
    }

    result.push_str(&format_footer(view));
    result
}

/// Table rendering of the visible doctors
pub fn format_list_table(doctors: &[ProviderRecord]) -> prettytable::Table {
    let mut table = new_table();
    table.set_titles(prettytable::row![
        "#",
        "Name",
        "Specialty",
        "Experience",
        "Fees",
        "Consult"
    ]);

    for (idx, doctor) in doctors.iter().enumerate() {
        table.add_row(prettytable::row![
            idx + 1,
            doctor.name.as_deref().unwrap_or("(No name)"),
            doctor.specialty_names().collect::<Vec<_>>().join(", "),
            doctor.experience.as_deref().unwrap_or("-"),
            doctor.fees.as_deref().unwrap_or("-"),
            consult_label(doctor)
        ]);
    }

    table
}

fn consult_label(doctor: &ProviderRecord) -> &'static str {
    match (doctor.video_consult, doctor.in_clinic) {
        (true, true) => "Video + In Clinic",
        (true, false) => "Video",
        (false, true) => "In Clinic",
        (false, false) => "-",
    }
}

/// Checkbox list of the catalog's specialties, marking the selected ones
pub fn format_specialties(available: &[String], state: &ViewState) -> String {
    if available.is_empty() {
        return format!("{}\n", "No specialties available yet.".yellow());
    }

    let mut result = format!("{}\n", "Speciality".bright_cyan().bold());
    for name in available {
        let mark = if state.specialties.contains(name) {
            "[x]".green().bold()
        } else {
            "[ ]".normal()
        };
        result.push_str(&format!("  {mark} {name}\n"));
    }
    result
}

pub fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return format!("{}\n", "No suggestions.".yellow());
    }

    suggestions
        .iter()
        .map(|name| format!("  {} {}\n", "›".cyan(), name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclist_core::Specialty;

    fn create_test_doctor(id: &str, name: &str) -> ProviderRecord {
        ProviderRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            video_consult: true,
            in_clinic: false,
            specialties: vec![Specialty {
                name: "Dentist".to_string(),
            }],
            fees: Some("₹ 500".to_string()),
            experience: Some("13 Years of experience".to_string()),
        }
    }

    fn create_test_view<'a>(
        doctors: &'a [ProviderRecord],
        state: &'a ViewState,
        status: &'a LoadStatus,
        query: &'a str,
    ) -> ViewModel<'a> {
        ViewModel {
            visible: doctors,
            state,
            specialties: &[],
            status,
            query,
            total: 10,
        }
    }

    #[test]
    fn test_format_list_json_structure() {
        let doctors = vec![create_test_doctor("1", "Dr. Alice")];
        let state = ViewState {
            sort_key: SortKey::Fee,
            ..ViewState::default()
        };
        let view = create_test_view(&doctors, &state, &LoadStatus::Ready, "sort=fees");

        let json = format_list_json(&ListOutput::from(view)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["query"], "sort=fees");
        assert_eq!(parsed["total"], 10);
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["state"]["sort_key"], "fee");
        assert_eq!(parsed["doctors"][0]["name"], "Dr. Alice");
        assert_eq!(parsed["doctors"][0]["specialities"][0]["name"], "Dentist");
    }

    #[test]
    fn test_format_list_text_basic() {
        let doctors = vec![
            create_test_doctor("1", "Dr. Alice"),
            create_test_doctor("2", "Dr. Bob"),
        ];
        let state = ViewState::default();
        let view = create_test_view(&doctors, &state, &LoadStatus::Ready, "");

        let formatted = format_list_text(view);

        assert!(formatted.contains("DOCTORS (2 of 10)"));
        assert!(formatted.contains("Dr. Alice"));
        assert!(formatted.contains("Dr. Bob"));
        assert!(formatted.contains("[1]"));
        assert!(formatted.contains("[2]"));
        assert!(formatted.contains("13 Years of experience"));
        assert!(formatted.contains("₹ 500"));
        assert!(formatted.contains("Dentist"));
    }

    #[test]
    fn test_format_list_text_empty_when_ready() {
        let state = ViewState::default();
        let view = create_test_view(&[], &state, &LoadStatus::Ready, "search=zzz");

        let formatted = format_list_text(view);

        assert!(formatted.contains("No doctors found matching your criteria."));
        assert!(formatted.contains("?search=zzz"));
    }

    #[test]
    fn test_format_list_text_loading() {
        let state = ViewState::default();
        let view = create_test_view(&[], &state, &LoadStatus::Loading, "");

        let formatted = format_list_text(view);

        assert!(formatted.contains("Loading doctors..."));
        assert!(!formatted.contains("No doctors found"));
    }

    #[test]
    fn test_format_list_text_missing_fields() {
        let doctor = ProviderRecord {
            id: "9".to_string(),
            name: None,
            video_consult: false,
            in_clinic: false,
            specialties: vec![],
            fees: None,
            experience: None,
        };
        let state = ViewState::default();
        let doctors = [doctor];
        let view = create_test_view(&doctors, &state, &LoadStatus::Ready, "");

        let formatted = format_list_text(view);

        assert!(formatted.contains("(No name)"));
        assert!(formatted.contains("unknown"));
        assert!(!formatted.contains("Specialty"));
    }

    #[test]
    fn test_format_filters() {
        let state = ViewState {
            search_term: "ali".to_string(),
            consultation_mode: ConsultationMode::InClinic,
            specialties: ["Dentist".to_string(), "ENT".to_string()].into(),
            sort_key: SortKey::Experience,
        };

        let formatted = format_filters(&state);

        assert!(formatted.contains("\"ali\""));
        assert!(formatted.contains("In Clinic"));
        assert!(formatted.contains("Dentist, ENT"));
        assert!(formatted.contains("Experience (Descending)"));
    }

    #[test]
    fn test_format_filters_defaults() {
        let formatted = format_filters(&ViewState::default());

        assert!(formatted.contains("Any"));
        assert!(formatted.contains("Catalog order"));
    }

    #[test]
    fn test_format_list_table_rows() {
        let doctors = vec![
            create_test_doctor("1", "Dr. Alice"),
            create_test_doctor("2", "Dr. Bob"),
        ];

        let table = format_list_table(&doctors);

        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Dr. Alice"));
        assert!(rendered.contains("Video"));
    }

    #[test]
    fn test_format_specialties_marks_selection() {
        let available = vec!["Cardiologist".to_string(), "Dentist".to_string()];
        let state = ViewState {
            specialties: ["Dentist".to_string()].into(),
            ..ViewState::default()
        };

        let formatted = format_specialties(&available, &state);

        assert!(formatted.contains("[x]"));
        assert!(formatted.contains("[ ]"));
        assert!(formatted.contains("Cardiologist"));
    }

    #[test]
    fn test_format_suggestions() {
        let formatted = format_suggestions(&["Dr. Alice".to_string(), "Dr. Alia".to_string()]);
        assert!(formatted.contains("Dr. Alice"));
        assert!(formatted.contains("Dr. Alia"));

        assert!(format_suggestions(&[]).contains("No suggestions."));
    }

    #[test]
    fn test_presenter_records_failure_and_stops_rendering() {
        let mut presenter = TerminalPresenter::deferred(OutputFormat::Text);
        presenter.fetch_failed(&FetchError::Status(503));

        assert_eq!(presenter.failure(), Some(&FetchError::Status(503)));
        assert!(format_fetch_error(&FetchError::Status(503)).contains("HTTP 503"));
    }
}
