//! Renders the federated SDL from the extracted type model and the effective options.
//!
//! Output is line oriented and stable: types in registry order, fields two spaces deep, lines
//! joined by `\n` without a trailing newline.

use std::fmt;
use std::fmt::Display;

use apollo_compiler::ast;
use itertools::Itertools;

use crate::display_helpers::write_indented_lines;
use crate::display_helpers::State;
use crate::options::FederationOptions;
use crate::options::FieldOptions;
use crate::options::TypeOptions;
use crate::schema::FieldDescriptor;
use crate::schema::TypeBody;
use crate::schema::TypeDescriptor;

pub(crate) struct FederatedSdl<'a> {
    pub(crate) types: &'a [TypeDescriptor],
    pub(crate) options: &'a FederationOptions,
}

impl Display for FederatedSdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut state = State::new(f);
        for ty in self.types {
            write_type(&mut state, ty, self.options.types.get(ty.name.as_str()))?;
        }
        Ok(())
    }
}

pub(crate) fn render_sdl(types: &[TypeDescriptor], options: &FederationOptions) -> String {
    FederatedSdl { types, options }.to_string()
}

fn write_type(
    state: &mut State<'_, '_>,
    ty: &TypeDescriptor,
    options: Option<&TypeOptions>,
) -> fmt::Result {
    state.new_line()?;
    if options.and_then(|options| options.extend) == Some(true) {
        state.write("extend ")?;
    }
    write!(state, "{} {}", ty.body.keyword(), ty.name)?;
    write_directives(
        state,
        &ty.directives,
        options.and_then(|options| options.directives.as_deref()),
    )?;

    match &ty.body {
        TypeBody::Object(fields) | TypeBody::Input(fields) => {
            state.write(" {")?;
            write_indented_lines(state, fields, |state, field| {
                let field_options =
                    options.and_then(|options| options.fields.get(field.name.as_str()));
                write_field(state, field, field_options)
            })?;
            state.write("}")
        }
        TypeBody::Enum(values) => {
            state.write(" {")?;
            write_indented_lines(state, values, |state, value| state.write(&value.value))?;
            state.write("}")
        }
        TypeBody::Union(members) => {
            state.write(" =")?;
            if members.is_empty() {
                return Ok(());
            }
            state.new_line()?;
            state.write(members.iter().map(|member| member.name.as_str()).format(" | "))
        }
        TypeBody::Scalar => Ok(()),
    }
}

fn write_field(
    state: &mut State<'_, '_>,
    field: &FieldDescriptor,
    options: Option<&FieldOptions>,
) -> fmt::Result {
    state.write(&field.name)?;
    if !field.arguments.is_empty() {
        write!(
            state,
            " ({})",
            field.arguments.iter().map(InputValue).format(", ")
        )?;
    }
    write!(state, ": {}", field.ty)?;
    if let Some(default_value) = &field.default_value {
        write!(state, " = {}", default_value.serialize().no_indent())?;
    }
    write_directives(
        state,
        &[],
        options.and_then(|options| options.directives.as_deref()),
    )
}

/// Schema directives first, then the literal directive text of the options.
fn write_directives(
    state: &mut State<'_, '_>,
    directives: &[apollo_compiler::Node<ast::Directive>],
    literal: Option<&str>,
) -> fmt::Result {
    for directive in directives {
        write!(state, " {}", directive.serialize().no_indent())?;
    }
    match literal.map(str::trim) {
        Some(literal) if !literal.is_empty() => write!(state, " {literal}"),
        _ => Ok(()),
    }
}

/// `name: Type[ = default]`
struct InputValue<'a>(&'a FieldDescriptor);

impl Display for InputValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.name, self.0.ty)?;
        if let Some(default_value) = &self.0.default_value {
            write!(f, " = {}", default_value.serialize().no_indent())?;
        }
        Ok(())
    }
}
