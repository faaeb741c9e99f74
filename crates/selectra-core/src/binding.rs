use crate::error::MisuseError;
use crate::option::ComboOption;

/// Who owns the selected value. Fixed for the lifetime of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// The owner supplies the value and receives every change request.
    Controlled { value: Option<String> },
    /// The widget keeps the value, seeded by an optional default.
    Uncontrolled { value: Option<String> },
}

impl Binding {
    pub fn controlled(value: Option<impl Into<String>>) -> Self {
        Self::Controlled {
            value: value.map(Into::into),
        }
    }

    pub fn uncontrolled(default: Option<impl Into<String>>) -> Self {
        Self::Uncontrolled {
            value: default.map(Into::into),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Controlled { value } | Self::Uncontrolled { value } => value.as_deref(),
        }
    }

    /// Record a change requested by the user. Only the uncontrolled binding
    /// moves; a controlled one waits for the owner to re-supply the value.
    pub fn commit(&mut self, next: Option<&str>) {
        if let Self::Uncontrolled { value } = self {
            *value = next.map(str::to_string);
        }
    }

    /// Owner re-supplies the canonical value.
    pub fn supply(&mut self, next: Option<&str>) -> Result<(), MisuseError> {
        match self {
            Self::Controlled { value } => {
                *value = next.map(str::to_string);
                Ok(())
            }
            Self::Uncontrolled { .. } => Err(MisuseError::NotControlled),
        }
    }

    /// Label of the bound option, if the value names one in `options`.
    pub fn label_in<'a>(&self, options: &'a [ComboOption]) -> Option<&'a str> {
        let value = self.value()?;
        options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::Uncontrolled { value: None }
    }
}
