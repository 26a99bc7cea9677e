use crate::foundation::error::{NetevoError, NetevoResult};

/// Input/output shape of a task the networks were evolved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskSpec {
    /// Task identifier as passed on the command line.
    pub name: &'static str,
    /// Observation size, not counting the bias node.
    pub input_size: usize,
    /// Action size.
    pub output_size: usize,
}

const KNOWN_TASKS: &[TaskSpec] = &[
    TaskSpec {
        name: "swingup",
        input_size: 5,
        output_size: 1,
    },
    TaskSpec {
        name: "biped",
        input_size: 24,
        output_size: 4,
    },
    TaskSpec {
        name: "slimevolley",
        input_size: 12,
        output_size: 3,
    },
    TaskSpec {
        name: "classify",
        input_size: 256,
        output_size: 10,
    },
];

impl TaskSpec {
    /// Look up a task by name.
    pub fn lookup(name: &str) -> NetevoResult<Self> {
        KNOWN_TASKS
            .iter()
            .find(|t| t.name == name)
            .copied()
            .ok_or_else(|| {
                let known: Vec<_> = KNOWN_TASKS.iter().map(|t| t.name).collect();
                NetevoError::render(format!(
                    "unknown task '{name}' (known: {})",
                    known.join(", ")
                ))
            })
    }

    /// All tasks with a known shape.
    pub fn known() -> &'static [TaskSpec] {
        KNOWN_TASKS
    }

    /// Input nodes including the leading bias node.
    pub fn input_nodes(&self) -> usize {
        self.input_size + 1
    }

    /// Smallest node count a snapshot for this task can have.
    pub fn min_nodes(&self) -> usize {
        self.input_nodes() + self.output_size
    }
}
