use std::io::{self, BufRead, Write};

use crate::domain::{DatasetId, VariableId};
use crate::error::CatalogError;
use crate::filter::FilterCriteria;
use crate::output::{ListResult, OutputMode, SelectionResult};
use crate::store::{CatalogSource, CatalogStore};

/// One line of session input.
///
/// `filter <json>` replaces the criteria, `reset` restores the criteria the
/// session started with, `select <id>` / `variable <id>` select, `clear`
/// drops the dataset selection, `list` / `show` print, `quit` ends input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Filter(FilterCriteria),
    Reset,
    Select(DatasetId),
    Variable(VariableId),
    Clear,
    List,
    Show,
    Quit,
}

#[derive(Debug, Clone)]
pub enum SessionOutput {
    List(ListResult),
    Selection(SelectionResult),
    Quit,
}

pub fn parse_session_command(input: &str) -> Result<SessionCommand, CatalogError> {
    let trimmed = input.trim();
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb {
        "filter" => serde_json::from_str(rest)
            .map(SessionCommand::Filter)
            .map_err(|err| CatalogError::InvalidCommand(format!("filter: {err}"))),
        "reset" => Ok(SessionCommand::Reset),
        "select" => Ok(SessionCommand::Select(rest.parse()?)),
        "variable" => Ok(SessionCommand::Variable(rest.parse()?)),
        "clear" => Ok(SessionCommand::Clear),
        "list" => Ok(SessionCommand::List),
        "show" => Ok(SessionCommand::Show),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "" => Err(CatalogError::InvalidCommand("empty command".to_string())),
        other => Err(CatalogError::InvalidCommand(format!("unknown command {other:?}"))),
    }
}

pub struct Session<S: CatalogSource> {
    store: CatalogStore<S>,
    initial_criteria: FilterCriteria,
}

impl<S: CatalogSource> Session<S> {
    /// Loads the catalog and remembers the current criteria for `reset`.
    pub fn new(mut store: CatalogStore<S>) -> Self {
        store.load();
        let initial_criteria = store.filter_criteria().clone();
        Self {
            store,
            initial_criteria,
        }
    }

    pub fn store(&self) -> &CatalogStore<S> {
        &self.store
    }

    pub fn into_store(self) -> CatalogStore<S> {
        self.store
    }

    pub fn execute(&mut self, command: SessionCommand) -> Result<SessionOutput, CatalogError> {
        match command {
            SessionCommand::Filter(criteria) => {
                self.store.set_filter_criteria(criteria);
                Ok(self.list())
            }
            SessionCommand::Reset => {
                self.store.set_filter_criteria(self.initial_criteria.clone());
                Ok(self.list())
            }
            SessionCommand::Select(id) => {
                self.store.load_dataset(id.clone());
                if self.store.selected_dataset().is_none() {
                    return Err(CatalogError::DatasetNotFound(id.to_string()));
                }
                Ok(self.selection())
            }
            SessionCommand::Variable(id) => {
                self.store.load_and_select_variable(id.clone());
                ensure_variable_selected(&self.store, &id)?;
                Ok(self.selection())
            }
            SessionCommand::Clear => {
                self.store.clear_selection();
                Ok(self.selection())
            }
            SessionCommand::List => Ok(self.list()),
            SessionCommand::Show => Ok(self.selection()),
            SessionCommand::Quit => Ok(SessionOutput::Quit),
        }
    }

    /// Executes `input` line by line. Blank lines and `#` comments are
    /// skipped; a failing line is reported on `errors` and the session
    /// continues.
    pub fn run<R, W, E>(
        &mut self,
        input: R,
        out: &mut W,
        errors: &mut E,
        output_mode: OutputMode,
    ) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match parse_session_command(trimmed).and_then(|command| self.execute(command)) {
                Ok(SessionOutput::List(result)) => output_mode.write_list(out, &result)?,
                Ok(SessionOutput::Selection(result)) => {
                    output_mode.write_selection(out, &result)?
                }
                Ok(SessionOutput::Quit) => break,
                Err(error) => writeln!(errors, "{:?}", miette::Report::new(error))?,
            }
        }
        Ok(())
    }

    fn list(&self) -> SessionOutput {
        SessionOutput::List(ListResult::from_store(&self.store))
    }

    fn selection(&self) -> SessionOutput {
        SessionOutput::Selection(SelectionResult::from_store(&self.store))
    }
}

/// Selects `dataset` and optionally one of its variables, failing when
/// either id is not in the catalog.
pub fn show_selection<S: CatalogSource>(
    store: &mut CatalogStore<S>,
    dataset: DatasetId,
    variable: Option<VariableId>,
) -> Result<SelectionResult, CatalogError> {
    store.load_dataset(dataset.clone());
    if store.selected_dataset().is_none() {
        return Err(CatalogError::DatasetNotFound(dataset.to_string()));
    }
    if let Some(variable) = variable {
        store.load_and_select_variable(variable.clone());
        ensure_variable_selected(store, &variable)?;
    }
    Ok(SelectionResult::from_store(store))
}

fn ensure_variable_selected<S: CatalogSource>(
    store: &CatalogStore<S>,
    id: &VariableId,
) -> Result<(), CatalogError> {
    let dataset = store
        .selected_dataset()
        .ok_or(CatalogError::NoDatasetSelected)?;
    match store.selected_variable() {
        Some(variable) if &variable.id == id => Ok(()),
        _ => Err(CatalogError::VariableNotFound {
            dataset: dataset.id.to_string(),
            variable: id.to_string(),
        }),
    }
}
