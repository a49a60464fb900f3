use serde::{Deserialize, Serialize};

/// The first interface declared in a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceContract {
    /// Interface name
    pub name: String,

    /// Method names in declaration order
    pub methods: Vec<String>,

    /// Printed `type` declaration containing the interface
    pub text: String,
}

impl InterfaceContract {
    /// Name the implementation struct must carry
    #[must_use]
    pub fn implementation_name(&self) -> String {
        format!("{}Impl", self.name)
    }

    /// Position of a method in declaration order
    #[must_use]
    pub fn method_position(&self, method: &str) -> Option<usize> {
        self.methods.iter().position(|m| m == method)
    }
}

/// The `<Interface>Impl` struct declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImplementationBinding {
    pub struct_name: String,
    pub text: String,
}

/// The `var _ <Interface> = <Interface>Impl{}` declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConformanceAssertion {
    pub interface_name: String,
    pub struct_name: String,
    pub text: String,
}

/// Everything extracted from one source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFacts {
    pub contract: InterfaceContract,
    pub binding: ImplementationBinding,
    pub assertion: ConformanceAssertion,
}

impl SourceFacts {
    /// Method names in interface declaration order
    #[must_use]
    pub fn method_names(&self) -> &[String] {
        &self.contract.methods
    }
}
