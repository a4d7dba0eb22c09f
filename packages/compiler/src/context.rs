use crate::registry::FlatRegistry;
use marionette_common::Diagnostic;

/// Reserved registry name of the root adapter installed by `build_markup`
pub const ROOT_ADAPTER_NAME: &str = "RootAdapter";

/// Options for markup compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Text repeated once per nesting level
    pub indent: String,
    /// Registry name the root adapter is installed under
    pub root_adapter_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            root_adapter_name: ROOT_ADAPTER_NAME.to_string(),
        }
    }
}

/// Compilation context shared by the node compiler and attribute serializer
pub struct CompilerContext<'a> {
    registry: &'a FlatRegistry,
    pub options: &'a CompileOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CompilerContext<'a> {
    pub fn new(registry: &'a FlatRegistry, options: &'a CompileOptions) -> Self {
        Self {
            registry,
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a FlatRegistry {
        self.registry
    }

    pub fn indentation(&self, level: usize) -> String {
        self.options.indent.repeat(level)
    }

    /// Record a diagnostic and forward it to the log
    pub fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
