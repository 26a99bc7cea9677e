use kurbo::{Point, Rect};

use crate::foundation::error::{NetevoError, NetevoResult};
use crate::render::task::TaskSpec;
use crate::snapshot::matrix::NetworkMatrix;

/// What a node is for, derived from its position in the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// Constant input, always node 0.
    Bias,
    /// Observation input.
    Input,
    /// Evolved hidden node.
    Hidden,
    /// Action output.
    Output,
}

/// A node with its layer and position on the plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedNode {
    /// Row index in the snapshot matrix.
    pub index: usize,
    /// Role of the node.
    pub role: NodeRole,
    /// Layer column, 0 for inputs.
    pub layer: usize,
    /// Center in pixel coordinates.
    pub pos: Point,
}

/// Layered placement of every node in a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkLayout {
    /// One entry per matrix row, in row order.
    pub nodes: Vec<PlacedNode>,
    /// Number of layer columns, inputs and outputs included.
    pub layer_count: usize,
}

impl NetworkLayout {
    /// Largest number of nodes sharing one layer.
    pub fn widest_layer(&self) -> usize {
        let mut counts = vec![0usize; self.layer_count];
        for n in &self.nodes {
            counts[n.layer] += 1;
        }
        counts.into_iter().max().unwrap_or(0)
    }
}

/// Roles of all nodes: bias, inputs, hidden nodes, then outputs.
pub fn node_roles(m: &NetworkMatrix, task: &TaskSpec) -> NetevoResult<Vec<NodeRole>> {
    let n = m.node_count();
    if m.weight_cols() != n {
        return Err(NetevoError::render(format!(
            "weight matrix must be square, got {n}x{}",
            m.weight_cols()
        )));
    }
    if n < task.min_nodes() {
        return Err(NetevoError::render(format!(
            "task '{}' needs at least {} nodes, snapshot has {n}",
            task.name,
            task.min_nodes()
        )));
    }

    let first_output = n - task.output_size;
    Ok((0..n)
        .map(|i| match i {
            0 => NodeRole::Bias,
            i if i < task.input_nodes() => NodeRole::Input,
            i if i >= first_output => NodeRole::Output,
            _ => NodeRole::Hidden,
        })
        .collect())
}

/// Layer column of every node.
///
/// Hidden nodes sit at `1 + depth`, where depth is the longest chain of hidden predecessors.
/// Outputs share the column after the deepest hidden node. NaN weights are treated as absent.
pub fn assign_layers(m: &NetworkMatrix, roles: &[NodeRole]) -> NetevoResult<Vec<usize>> {
    let hidden: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == NodeRole::Hidden)
        .map(|(i, _)| i)
        .collect();

    let connected = |src: usize, dst: usize| {
        m.weight(src, dst)
            .is_some_and(|w| w != 0.0 && !w.is_nan())
    };

    let mut depth = vec![0usize; hidden.len()];
    let mut passes = 0usize;
    loop {
        let mut changed = false;
        for (di, &dst) in hidden.iter().enumerate() {
            let d = hidden
                .iter()
                .enumerate()
                .filter(|&(_, &src)| connected(src, dst))
                .map(|(si, _)| depth[si] + 1)
                .max()
                .unwrap_or(0);
            if d != depth[di] {
                depth[di] = d;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        passes += 1;
        if passes > hidden.len() {
            return Err(NetevoError::render(
                "hidden connections contain a cycle; cannot layer the network",
            ));
        }
    }

    let output_layer = depth.iter().max().map_or(1, |d| d + 2);
    let mut layers = vec![0usize; roles.len()];
    for (di, &node) in hidden.iter().enumerate() {
        layers[node] = depth[di] + 1;
    }
    for (i, role) in roles.iter().enumerate() {
        if *role == NodeRole::Output {
            layers[i] = output_layer;
        }
    }
    Ok(layers)
}

/// Place every node on `area`: layers left to right, nodes of a layer spread top to bottom.
pub fn layout_network(
    m: &NetworkMatrix,
    task: &TaskSpec,
    area: Rect,
) -> NetevoResult<NetworkLayout> {
    let roles = node_roles(m, task)?;
    let layers = assign_layers(m, &roles)?;
    let layer_count = layers.iter().max().map_or(1, |l| l + 1);

    let mut per_layer = vec![0usize; layer_count];
    for &l in &layers {
        per_layer[l] += 1;
    }

    let mut seen = vec![0usize; layer_count];
    let mut nodes = Vec::with_capacity(roles.len());
    for (index, (&role, &layer)) in roles.iter().zip(&layers).enumerate() {
        let x = if layer_count > 1 {
            area.x0 + area.width() * layer as f64 / (layer_count - 1) as f64
        } else {
            area.center().x
        };
        let slot = seen[layer];
        seen[layer] += 1;
        let y = area.y0 + area.height() * (slot + 1) as f64 / (per_layer[layer] + 1) as f64;

        nodes.push(PlacedNode {
            index,
            role,
            layer,
            pos: Point::new(x, y),
        });
    }

    Ok(NetworkLayout { nodes, layer_count })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
