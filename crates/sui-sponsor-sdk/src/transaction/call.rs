//! Call descriptors: which Move function to call and with what.

use crate::encoding;
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::argument::{ArgumentFormatter, ArgumentValue, ParameterKind, RawArgument};
use crate::types::{ObjectId, ObjectRef, SuiAddress, TypeTag};
use serde::Serialize;
use std::fmt;

/// A fully formatted Move call.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::transaction::{CallDescriptor, ParameterKind};
///
/// let call = CallDescriptor::new("0x2::coin::zero")
///     .type_arg("0x2::sui::SUI")
///     .build()
///     .unwrap();
/// assert_eq!(call.function(), "zero");
/// assert_eq!(call.type_arguments().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallDescriptor {
    package: ObjectId,
    module: String,
    function: String,
    type_arguments: Vec<TypeTag>,
    arguments: Vec<ArgumentValue>,
}

impl CallDescriptor {
    /// Starts building a call to `target`, written `package::module::function`.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(target: &str) -> CallDescriptorBuilder {
        CallDescriptorBuilder::new(target)
    }

    /// Creates a call from already validated parts.
    pub fn from_parts(
        package: ObjectId,
        module: impl Into<String>,
        function: impl Into<String>,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<ArgumentValue>,
    ) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
            type_arguments,
            arguments,
        }
    }

    /// Returns the package id.
    pub fn package(&self) -> ObjectId {
        self.package
    }

    /// Returns the module name.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the function name.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Returns `package::module`.
    pub fn module_path(&self) -> String {
        format!("{}::{}", self.package, self.module)
    }

    /// Returns the type arguments.
    pub fn type_arguments(&self) -> &[TypeTag] {
        &self.type_arguments
    }

    /// Returns the formatted arguments.
    pub fn arguments(&self) -> &[ArgumentValue] {
        &self.arguments
    }

    /// Returns true if any argument must be resolved against the ledger.
    pub fn has_object_arguments(&self) -> bool {
        self.arguments.iter().any(ArgumentValue::is_object)
    }
}

impl fmt::Display for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_path(), self.function)
    }
}

/// Splits `package::module::function` into its parts.
fn parse_target(target: &str) -> Result<(ObjectId, String, String), String> {
    let parts: Vec<&str> = target.trim().split("::").collect();
    let [package, module, function] = parts.as_slice() else {
        return Err(format!(
            "invalid call target '{target}': expected package::module::function"
        ));
    };
    let package = SuiAddress::from_hex(package)
        .map_err(|e| format!("invalid package in '{target}': {e}"))?;
    for name in [module, function] {
        if !is_identifier(name) {
            return Err(format!("invalid identifier '{name}' in '{target}'"));
        }
    }
    Ok((package, (*module).to_string(), (*function).to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builder for [`CallDescriptor`].
///
/// Errors are collected and reported together by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CallDescriptorBuilder {
    target: Result<(ObjectId, String, String), String>,
    type_arguments: Vec<TypeTag>,
    arguments: Vec<ArgumentValue>,
    errors: Vec<String>,
}

impl CallDescriptorBuilder {
    #[must_use]
    fn new(target: &str) -> Self {
        Self {
            target: parse_target(target),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn next_index(&self) -> usize {
        self.arguments.len()
    }

    fn push(&mut self, value: SponsorResult<ArgumentValue>) {
        match value {
            Ok(value) => self.arguments.push(value),
            Err(e) => {
                self.errors.push(e.to_string());
                // keep positions stable for later error messages
                self.arguments.push(ArgumentValue::PureBytes(Vec::new()));
            }
        }
    }

    /// Adds a type argument such as `0x2::sui::SUI`.
    #[must_use]
    pub fn type_arg(mut self, type_arg: &str) -> Self {
        match type_arg.parse::<TypeTag>() {
            Ok(tag) => self.type_arguments.push(tag),
            Err(e) => self
                .errors
                .push(format!("invalid type argument '{type_arg}': {e}")),
        }
        self
    }

    /// Adds a parsed type argument.
    #[must_use]
    pub fn type_arg_typed(mut self, type_arg: TypeTag) -> Self {
        self.type_arguments.push(type_arg);
        self
    }

    /// Adds an argument of a declared kind.
    #[must_use]
    pub fn arg(mut self, kind: ParameterKind, raw: impl Into<RawArgument>) -> Self {
        let value = ArgumentFormatter::format(self.next_index(), &kind, raw.into());
        self.push(value);
        self
    }

    /// Adds an argument classified by its shape.
    #[must_use]
    pub fn infer_arg(mut self, raw: impl Into<RawArgument>) -> Self {
        let index = self.next_index();
        let value =
            ArgumentFormatter::infer(raw.into()).map_err(|e| SponsorError::argument(index, e));
        self.push(value);
        self
    }

    /// Adds a pure argument from any serializable value.
    #[must_use]
    pub fn pure<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        let index = self.next_index();
        let value = encoding::encode(value)
            .map(ArgumentValue::PureBytes)
            .map_err(|e| SponsorError::argument(index, e));
        self.push(value);
        self
    }

    /// Adds an object by id, resolved when the transaction is built.
    #[must_use]
    pub fn object(mut self, id: ObjectId, mutable: bool) -> Self {
        self.arguments.push(ArgumentValue::Object { id, mutable });
        self
    }

    /// Adds an owned object pinned to a known reference.
    #[must_use]
    pub fn object_ref(mut self, object_ref: ObjectRef) -> Self {
        self.arguments.push(ArgumentValue::ObjectRef(object_ref));
        self
    }

    /// Adds an already formatted argument.
    #[must_use]
    pub fn value(mut self, value: ArgumentValue) -> Self {
        self.arguments.push(value);
        self
    }

    /// Builds the call, failing with every collected error.
    pub fn build(self) -> SponsorResult<CallDescriptor> {
        let (package, module, function) = self.target.map_err(SponsorError::Format)?;
        if !self.errors.is_empty() {
            return Err(SponsorError::format(self.errors.join("; ")));
        }
        Ok(CallDescriptor {
            package,
            module,
            function,
            type_arguments: self.type_arguments,
            arguments: self.arguments,
        })
    }
}

/// A declared function signature: target plus one kind per parameter.
///
/// # Example
///
/// ```rust
/// use sui_sponsor_sdk::transaction::{FunctionSignature, ParameterKind};
///
/// let create = FunctionSignature::new(
///     "0x2::example::create",
///     vec![ParameterKind::OptionalString, ParameterKind::SharedClock],
/// );
/// let call = create.call(&[], vec!["Qm123".into(), "0x6".into()]).unwrap();
/// assert!(call.has_object_arguments());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    target: String,
    parameters: Vec<ParameterKind>,
    type_parameters: usize,
}

impl FunctionSignature {
    /// Declares a signature without type parameters.
    pub fn new(target: impl Into<String>, parameters: Vec<ParameterKind>) -> Self {
        Self {
            target: target.into(),
            parameters,
            type_parameters: 0,
        }
    }

    /// Sets the number of type parameters.
    #[must_use]
    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    /// Returns the call target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the declared parameter kinds.
    pub fn parameters(&self) -> &[ParameterKind] {
        &self.parameters
    }

    /// Formats `arguments` against this signature.
    pub fn call(
        &self,
        type_arguments: &[&str],
        arguments: Vec<RawArgument>,
    ) -> SponsorResult<CallDescriptor> {
        if type_arguments.len() != self.type_parameters {
            return Err(SponsorError::format(format!(
                "{} takes {} type arguments, got {}",
                self.target,
                self.type_parameters,
                type_arguments.len()
            )));
        }
        let values = ArgumentFormatter::format_all(&self.parameters, arguments)?;
        type_arguments
            .iter()
            .fold(CallDescriptor::new(&self.target), |builder, tag| {
                builder.type_arg(tag)
            })
            .build()
            .map(|call| CallDescriptor {
                arguments: values,
                ..call
            })
    }
}
