// Licensed under the Apache-2.0 license

//! Rewriting of emitted YAML into the CPSW dialect, and the file write
//! sequence.
//!
//! Line rules, first match wins:
//!
//! | line contains | becomes                                              |
//! |---------------|------------------------------------------------------|
//! | `children:`   | the line between two 10-`#` markers at its indent     |
//! | `'#'`         | an 80-`#` banner at the line's indent                 |
//! | `'##'`        | an 80-`#` banner two columns left of the line         |
//! | `'`           | the line with every `'` removed                       |
//!
//! Any other line is kept as is. The banner rules replace the whole line, so
//! text after a banner key is discarded.

use crate::config::ConverterConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::sink::{sink_debug, sink_warn};
use crate::util::{banner, indentation};
use log::Log;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const CHILDREN_MARKER: &str = "children:";
const OPEN_BANNER: &str = "'#'";
const CLOSE_BANNER: &str = "'##'";
const CHILDREN_MARKER_WIDTH: usize = 10;
const BANNER_WIDTH: usize = 80;

/// Rewrite one line. `line` may end with `\n`; the result always keeps it.
pub fn process_line(line: &str) -> String {
    let indent = indentation(line);
    if line.contains(CHILDREN_MARKER) {
        let marker = format!("{}\n", banner(indent, CHILDREN_MARKER_WIDTH));
        format!("{marker}{line}{marker}")
    } else if line.contains(OPEN_BANNER) {
        format!("{}\n", banner(indent, BANNER_WIDTH))
    } else if line.contains(CLOSE_BANNER) {
        format!("{}\n", banner(indent.saturating_sub(2), BANNER_WIDTH))
    } else if line.contains('\'') {
        line.replace('\'', "")
    } else {
        line.to_string()
    }
}

/// Apply [`process_line`] to every line of `body`.
pub fn post_process(body: &str) -> String {
    body.split_inclusive('\n').map(process_line).collect()
}

/// License banner and CPSW directives that open every generated file.
///
/// ```
/// use registers_cpsw_yaml::{postprocess::header, ConverterConfig};
///
/// let config = ConverterConfig::with_defaults().license_banner(&["# banner"]);
/// assert_eq!(
///     header(&config, "Dev.yaml"),
///     "# banner\n#schemaversion 3.0.0 \n#once Dev.yaml \n\n\n"
/// );
/// ```
pub fn header(config: &ConverterConfig, file_name: &str) -> String {
    let mut text = String::new();
    for line in &config.license_banner {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(&format!("#schemaversion {} \n", config.schema_version));
    text.push_str(&format!("#once {file_name} \n\n\n"));
    text
}

/// Write `body` to `dir/file_name` through an intermediate file.
///
/// The emitted text is first written to the temporary file, read back,
/// post-processed and written after the header to the final file, which must
/// not already exist. The temporary file is removed afterwards. On failure,
/// neither a partial final file nor the temporary file is left behind.
pub fn write_output(
    dir: &Path,
    file_name: &str,
    body: &str,
    config: &ConverterConfig,
    sink: &dyn Log,
) -> ConvertResult<PathBuf> {
    let temp_path = dir.join(config.temp_file_name(file_name));
    let final_path = dir.join(file_name);

    fs::write(&temp_path, body).map_err(ConvertError::io(&temp_path))?;
    sink_debug!(sink, "Wrote intermediate file {}", temp_path.display());

    let result = finish_output(&temp_path, &final_path, file_name, config, sink);
    if let Err(err) = fs::remove_file(&temp_path) {
        sink_warn!(
            sink,
            "Failed to remove intermediate file {}: {err}",
            temp_path.display()
        );
    }
    result.map(|()| final_path)
}

fn finish_output(
    temp_path: &Path,
    final_path: &Path,
    file_name: &str,
    config: &ConverterConfig,
    sink: &dyn Log,
) -> ConvertResult<()> {
    let emitted = fs::read_to_string(temp_path).map_err(ConvertError::io(temp_path))?;
    let text = header(config, file_name) + &post_process(&emitted);

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(final_path)
        .map_err(ConvertError::io(final_path))?;
    if let Err(err) = file.write_all(text.as_bytes()).and_then(|()| file.flush()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(final_path) {
            sink_warn!(
                sink,
                "Failed to remove partial output {}: {cleanup}",
                final_path.display()
            );
        }
        return Err(ConvertError::io(final_path)(err));
    }
    sink_debug!(sink, "Wrote {}", final_path.display());
    Ok(())
}
