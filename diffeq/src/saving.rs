/// The recorded output of a fixed-step integration.
///
/// Entry `k` holds the sample time `t_k`, the state at `t_k`, and the input applied over
/// `[t_k, t_k + dt)`. Entry 0 is the initial state. The buffer is only appended to by the
/// solver; consumers get read-only access or take ownership of the columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory<State, Input> {
    t: Vec<f64>,
    y: Vec<State>,
    u: Vec<Input>,
}

impl<State, Input> Trajectory<State, Input> {
    /// Constructs an empty trajectory with room for `n` entries.
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            u: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, t: f64, y: State, u: Input) {
        self.t.push(t);
        self.y.push(y);
        self.u.push(u);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Recorded sample times.
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    /// Recorded states.
    pub fn states(&self) -> &[State] {
        &self.y
    }

    /// Recorded inputs.
    pub fn inputs(&self) -> &[Input] {
        &self.u
    }

    pub fn last_state(&self) -> Option<&State> {
        self.y.last()
    }

    /// Iterates `(t, state, input)` rows in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State, &Input)> {
        self.t
            .iter()
            .zip(self.y.iter())
            .zip(self.u.iter())
            .map(|((t, y), u)| (*t, y, u))
    }

    /// Hands the columns over to the consumer.
    pub fn into_parts(self) -> (Vec<f64>, Vec<State>, Vec<Input>) {
        (self.t, self.y, self.u)
    }
}
