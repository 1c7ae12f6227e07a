use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The workflow route a program belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Activation,
    Reduction,
    Shipment,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Activation, Route::Reduction, Route::Shipment];

    /// The two routes other than `self`, in declaration order.
    pub fn others(self) -> impl Iterator<Item = Route> {
        Self::ALL.into_iter().filter(move |r| *r != self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Route::Activation => "activation",
            Route::Reduction => "reduction",
            Route::Shipment => "shipment",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation category of an instruction, stored upper-case on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OpClass {
    /// `AC`: moves stock into or out of the active pool.
    Activation,
    /// `RD`: records a reduction.
    Reduction,
    /// `SH`: records a shipment.
    Shipment,
    /// `ST`: direct stock update.
    Stock,
    /// `PRE`: maintenance step run before the program.
    PreStep,
    /// `POST`: maintenance step run after the program.
    PostStep,
    /// `SYNC`: maintenance step keeping the virtual pool in sync.
    PoolSync,
    /// Any other token supplied by the registry.
    Other(String),
}

impl OpClass {
    pub fn token(&self) -> &str {
        match self {
            OpClass::Activation => "AC",
            OpClass::Reduction => "RD",
            OpClass::Shipment => "SH",
            OpClass::Stock => "ST",
            OpClass::PreStep => "PRE",
            OpClass::PostStep => "POST",
            OpClass::PoolSync => "SYNC",
            OpClass::Other(token) => token,
        }
    }

    /// Maintenance classes are never user-editable and only pass through the codec.
    pub fn is_maintenance(&self) -> bool {
        matches!(
            self,
            OpClass::PreStep | OpClass::PostStep | OpClass::PoolSync
        )
    }
}

impl FromStr for OpClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        Ok(match token.as_str() {
            "" => return Err("empty class token".to_string()),
            "AC" => OpClass::Activation,
            "RD" => OpClass::Reduction,
            "SH" => OpClass::Shipment,
            "ST" => OpClass::Stock,
            "PRE" => OpClass::PreStep,
            "POST" => OpClass::PostStep,
            "SYNC" => OpClass::PoolSync,
            _ => OpClass::Other(token),
        })
    }
}

impl TryFrom<String> for OpClass {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OpClass> for String {
    fn from(class: OpClass) -> Self {
        class.token().to_string()
    }
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One inventory-mutating step.
///
/// Parsed instructions are always complete. Drafts created in the editor may
/// lack a class, function or target until the user fills them in; such drafts
/// are skipped when a tree is encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub class: Option<OpClass>,
    pub function: String,
    pub target_id: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl Instruction {
    pub fn new(class: OpClass, function: &str, target_id: &str, params: Vec<String>) -> Self {
        Self {
            class: Some(class),
            function: function.to_string(),
            target_id: target_id.to_string(),
            params,
        }
    }

    /// An empty draft bound to `target_id`.
    pub fn draft(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.class.is_some() && !self.function.is_empty() && !self.target_id.is_empty()
    }

    /// The wire token for this instruction, or `None` for an incomplete draft.
    ///
    /// Empty params are skipped rather than kept as positional placeholders.
    pub fn to_token(&self) -> Option<String> {
        let class = self.class.as_ref().filter(|_| self.is_complete())?;
        let mut token = format!("{}:{}:{}", class.token(), self.function, self.target_id);
        for param in self.params.iter().filter(|p| !p.is_empty()) {
            token.push(':');
            token.push_str(param);
        }
        Some(token)
    }
}

/// The three route programs of a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSet {
    #[serde(default)]
    pub activation: String,
    #[serde(default)]
    pub reduction: String,
    #[serde(default)]
    pub shipment: String,
}

impl ProgramSet {
    pub fn get(&self, route: Route) -> &str {
        match route {
            Route::Activation => &self.activation,
            Route::Reduction => &self.reduction,
            Route::Shipment => &self.shipment,
        }
    }

    pub fn set(&mut self, route: Route, program: String) {
        match route {
            Route::Activation => self.activation = program,
            Route::Reduction => self.reduction = program,
            Route::Shipment => self.shipment = program,
        }
    }
}
