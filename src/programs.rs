//! Built-in programs embedded at compile time, parsed once and shared through `ProgramManager`.

use crate::parser::parse;
use crate::types::{Program, TuringMachineError};

use std::sync::RwLock;
use tracing::warn;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../programs/binary-increment.tur"),
    include_str!("../programs/word-wrap.tur"),
    include_str!("../programs/busy-beaver-3.tur"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<BuiltinProgram>> = RwLock::new(Vec::new());
}

/// A parsed built-in program together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct BuiltinProgram {
    pub program: Program,
    pub text: &'static str,
}

/// Parses `texts`, skipping the ones that fail so that every entry keeps its own source.
fn parse_builtins(texts: &[&'static str]) -> Vec<BuiltinProgram> {
    texts
        .iter()
        .enumerate()
        .filter_map(|(index, &text)| match parse(text) {
            Ok(program) => Some(BuiltinProgram { program, text }),
            Err(e) => {
                warn!(index, error = %e, "failed to parse built-in program");
                None
            }
        })
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into `PROGRAMS`, once.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut write_guard = PROGRAMS.write().map_err(|_| lock_error())?;
        if !write_guard.is_empty() {
            return Ok(());
        }

        write_guard.extend(parse_builtins(&PROGRAM_TEXTS));

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| lock_error())?
            .get(index)
            .map(|builtin| builtin.program.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| lock_error())?
            .iter()
            .map(|builtin| &builtin.program)
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|builtin| builtin.program.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.initial_state.clone(),
            initial_tape: program.tape.clone(),
            state_count: program.states.len(),
            transition_count: program.rules.len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let _ = Self::load();
        let query = query.to_lowercase();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .enumerate()
                    .filter(|(_, builtin)| {
                        builtin.program.name.to_lowercase().contains(&query)
                    })
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the source text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| lock_error())?
            .get(index)
            .map(|builtin| builtin.text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!(
                    "Program text index {} out of range",
                    index
                ))
            })
    }
}

fn lock_error() -> TuringMachineError {
    TuringMachineError::ValidationError("Program registry lock is poisoned".to_string())
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::operator::Operator;

    fn run(name: &str, input: &str) -> TuringMachine {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        let mut machine = TuringMachine::new(program);
        machine.reset_with_tape(input).unwrap();
        Operator::default().run(&mut machine).unwrap();
        machine
    }

    #[test]
    fn test_program_manager_initialization() {
        assert!(ProgramManager::load().is_ok());
        assert!(ProgramManager::load().is_ok());

        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(names, vec!["Binary increment", "Word wrap", "Busy Beaver 3"]);
    }

    #[test]
    fn test_all_programs_run_their_default_tape() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            let name = program.name.clone();
            let mut machine = TuringMachine::new(program);

            let result = Operator::default().run(&mut machine);
            assert!(result.is_ok(), "Program '{}' did not halt", name);
            assert!(machine.accepted(), "Program '{}' was not accepted", name);
        }
    }

    #[test]
    fn test_binary_increment() {
        let machine = run("Binary increment", "101");
        assert!(machine.accepted());
        assert_eq!(machine.tape_content(), "110");

        let machine = run("binary increment", "111");
        assert_eq!(machine.tape_content(), "1000");
    }

    #[test]
    fn test_word_wrap() {
        assert_eq!(run("Word wrap", "XY").tape_content(), "<<<XY>>>");
        assert_eq!(run("Word wrap", "YYYYX").tape_content(), "<<<YYYYX>>>");
    }

    #[test]
    fn test_word_wrap_rejects_empty_word() {
        let machine = run("Word wrap", "");
        assert!(!machine.accepted());
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_busy_beaver() {
        let machine = run("Busy Beaver 3", "");
        assert!(machine.accepted());
        assert_eq!(machine.state(), "H");
        assert_eq!(machine.step_count(), 14);
        assert_eq!(machine.tape_content(), "111111");
    }

    #[test]
    fn test_broken_builtin_keeps_text_aligned() {
        let texts = [
            PROGRAM_TEXTS[0],
            "this is not a program",
            PROGRAM_TEXTS[2],
        ];

        let builtins = parse_builtins(&texts);
        assert_eq!(builtins.len(), 2);
        assert_eq!(builtins[1].program.name, "Busy Beaver 3");
        assert_eq!(builtins[1].text, PROGRAM_TEXTS[2]);
        assert!(builtins
            .iter()
            .all(|builtin| parse(builtin.text).unwrap() == builtin.program));
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("Binary increment").unwrap();
        assert_eq!(program.initial_tape(), "101");

        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();
        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Binary increment");
        assert_eq!(info.initial_state, "s_0");
        assert_eq!(info.initial_tape, "101");
        assert_eq!(info.state_count, 4);
        assert_eq!(info.transition_count, 9);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("binary"), vec![0]);
        assert_eq!(ProgramManager::search_programs("WRAP"), vec![1]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }

    #[test]
    fn test_program_text_by_index() {
        let text = ProgramManager::get_program_text_by_index(2).unwrap();
        assert!(text.contains("name: Busy Beaver 3"));
        assert!(ProgramManager::get_program_text_by_index(3).is_err());
    }
}
