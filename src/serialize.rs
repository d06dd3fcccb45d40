//! Textual serialization of a [`crate::Specification`] (component C6).
//!
//! Three line groups, in order: one `in <name>` line per declared input,
//! one `out <name>` line per bound output (in output order), then one
//! `<name> = <rendered expression>` line per bound output, in the same
//! order. No attempt is made to re-parse this format back into a
//! `Specification` — it is a write-only target-language rendering, not a
//! round-trippable wire format.

use std::io::Write;

use crate::error::Result;
use crate::spec::Specification;

/// Writes `spec`'s textual serialization to `sink`.
pub fn write<W: Write>(spec: &Specification, sink: &mut W) -> Result<()> {
    for input in spec.inputs() {
        writeln!(sink, "in {}", input.name())?;
    }
    for output in spec.outputs() {
        writeln!(sink, "out {}", output.name())?;
    }
    for output in spec.outputs() {
        let expr = spec
            .binding(output)
            .expect("every stream in outputs() has a binding by construction");
        writeln!(sink, "{} = {}", output.name(), expr.render())?;
    }
    Ok(())
}
