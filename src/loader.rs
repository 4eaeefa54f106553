use std::fs;
use std::io::ErrorKind;

use crate::Error;
use crate::config::Options;
use crate::diagnostic::{DiagnosticSink, TracingSink};
use crate::env_map::EnvMap;
use crate::parser::{FileError, FileErrorKind, Parser};
use crate::required::check_required;
use crate::store::{ProcessEnv, Store};

/// Parse every file in `options.files`, in order, into `store`.
///
/// A file that cannot be read, decoded, or fully parsed is recorded and
/// the remaining files are still processed. Required keys are checked
/// once all files are done, whether or not a file failed.
///
/// # Errors
///
/// Returns `Error::Files` with every per-file failure and the result of
/// the required-key check, or `Error::RequiredKeyMissing` naming every
/// missing or empty required key when all files parsed.
pub fn load<S, D>(options: &Options, store: &mut S, sink: &mut D) -> Result<EnvMap, Error>
where
    S: Store + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let mut envs = EnvMap::new();
    let mut errors = Vec::new();

    for file in &options.files {
        let text = match read_file(options, file) {
            Ok(text) => text,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let parsed = Parser::new(&mut *store, &mut envs, &mut *sink)
            .override_existing(options.override_existing)
            .debug(options.debug)
            .parse(file, &text);
        if let Err(e) = parsed {
            errors.push(e);
        }
    }

    let required = check_required(&options.required, &envs);
    if !errors.is_empty() {
        return Err(Error::Files {
            errors,
            missing: required.err(),
        });
    }

    required?;
    Ok(envs)
}

/// `load` against the process environment, reporting diagnostics
/// through `tracing`.
///
/// # Errors
///
/// See `load`.
pub fn load_process_env(options: &Options) -> Result<EnvMap, Error> {
    load(options, &mut ProcessEnv, &mut TracingSink)
}

fn read_file(options: &Options, file: &str) -> Result<String, FileError> {
    let path = options.path_for(file);
    let error = |kind| FileError {
        file: file.to_string(),
        kind,
        span: None,
    };

    let bytes = fs::read(&path).map_err(|e| {
        error(if e.kind() == ErrorKind::NotFound {
            FileErrorKind::NotFound { path: path.clone() }
        } else {
            FileErrorKind::Read {
                path: path.clone(),
                reason: e.to_string(),
            }
        })
    })?;

    options.encoding.decode(&bytes).map_err(|e| {
        error(FileErrorKind::Decode {
            encoding: e.encoding.to_string(),
        })
    })
}
