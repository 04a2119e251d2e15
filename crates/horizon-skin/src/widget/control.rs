//! Control state: value, command binding and input smoothing.

use horizon_skin_core::logging::targets;

/// Upper bound of the smoothing coefficient.
pub const MAX_SMOOTHING: f32 = 0.99;

/// Exponential smoothing of input deltas for analog controls.
///
/// `filtered = coef * filtered + (1 - coef) * raw`. A coefficient of zero
/// passes deltas through unchanged; values approaching one smooth harder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaFilter {
    coef: f32,
    filtered: f32,
}

impl Default for DeltaFilter {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl DeltaFilter {
    /// Create a filter. The coefficient is clamped to `[0, 0.99]`.
    pub fn new(coef: f32) -> Self {
        Self {
            coef: clamp_coef(coef),
            filtered: 0.0,
        }
    }

    /// The smoothing coefficient.
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.coef
    }

    /// Change the coefficient. The filter state is kept.
    pub fn set_coefficient(&mut self, coef: f32) {
        self.coef = clamp_coef(coef);
    }

    /// Feed a raw delta and return the filtered one.
    pub fn apply(&mut self, raw: f32) -> f32 {
        self.filtered = self.coef * self.filtered + (1.0 - self.coef) * raw;
        self.filtered
    }

    /// The last filtered output.
    #[inline]
    pub fn output(&self) -> f32 {
        self.filtered
    }

    /// Forget history. Called at the start of each capture session.
    pub fn reset(&mut self) {
        self.filtered = 0.0;
    }
}

fn clamp_coef(coef: f32) -> f32 {
    if coef.is_nan() {
        0.0
    } else {
        coef.clamp(0.0, MAX_SMOOTHING)
    }
}

/// State of an interactive widget.
///
/// The value always lies in `[min, max]`.
///
/// # Example
///
/// ```
/// use horizon_skin::widget::ControlState;
///
/// let mut volume = ControlState::new("Vol").with_range(0.0, 10.0);
/// volume.set_value(12.5);
/// assert_eq!(volume.value(), 10.0);
/// assert_eq!(volume.normalized(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    value: f32,
    min: f32,
    max: f32,
    default: f32,
    command: String,
    param: String,
    target: Option<String>,
    type_tag: Option<String>,
    reflect_param: bool,
    persist: bool,
    /// Smoothing applied to drag deltas.
    pub filter: DeltaFilter,
}

impl ControlState {
    /// A control bound to `command` with range `[0, 1]` and value 0.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 1.0,
            default: 0.0,
            command: command.into(),
            param: String::new(),
            target: None,
            type_tag: None,
            reflect_param: false,
            persist: false,
            filter: DeltaFilter::default(),
        }
    }

    /// Set the value range. A reversed range is swapped.
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.set_range(min, max);
        self
    }

    /// Set the default value, which also becomes the current value.
    pub fn with_default(mut self, default: f32) -> Self {
        self.default = default.clamp(self.min, self.max);
        self.value = self.default;
        self
    }

    /// Set the command parameter.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Set the command target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the command type tag.
    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Only reflect values from commands with the same parameter.
    pub fn with_reflect_param(mut self, reflect_param: bool) -> Self {
        self.reflect_param = reflect_param;
        self
    }

    /// Save and restore the value through preferences.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Set the smoothing coefficient.
    pub fn with_smoothing(mut self, coef: f32) -> Self {
        self.filter.set_coefficient(coef);
        self
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value, clamped to the range. Returns `true` if it changed.
    /// NaN is ignored.
    pub fn set_value(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let clamped = value.clamp(self.min, self.max);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }

    /// Lower bound.
    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Default value.
    #[inline]
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Change the range, re-clamping the value and default.
    pub fn set_range(&mut self, min: f32, max: f32) {
        let (min, max) = if min > max {
            tracing::error!(target: targets::SKIN, min, max, "reversed control range, swapping");
            (max, min)
        } else {
            (min, max)
        };
        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
        self.default = self.default.clamp(min, max);
    }

    /// Value mapped to `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }

    /// Set the value from `[0, 1]`. Returns `true` if it changed.
    pub fn set_normalized(&mut self, n: f32) -> bool {
        self.set_value(self.min + n.clamp(0.0, 1.0) * (self.max - self.min))
    }

    /// Return to the default value.
    pub fn reset(&mut self) -> bool {
        self.set_value(self.default)
    }

    // =========================================================================
    // Command binding
    // =========================================================================

    /// Command name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Command parameter (empty if none).
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Replace the parameter.
    pub fn set_param(&mut self, param: impl Into<String>) {
        self.param = param.into();
    }

    /// Command target.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Command type tag.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// Whether reflection is scoped by parameter.
    pub fn reflect_param(&self) -> bool {
        self.reflect_param
    }

    /// Whether the value is persisted.
    pub fn persist(&self) -> bool {
        self.persist
    }
}
