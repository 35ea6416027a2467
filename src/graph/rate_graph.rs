use crate::core::currency::CurrencyCode;
use crate::core::rates::RateTable;
use petgraph::algo::{dijkstra, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Directed graph of the tradable conversions in a [`RateTable`].
///
/// Nodes are the currencies of the table's universe, edges are pairs with a
/// positive rate between distinct currencies. Self-pairs and missing pairs
/// are left out, so every edge is a move the search may take.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
/// use conversion_engine::core::rates::RateTable;
/// use conversion_engine::graph::rate_graph::RateGraph;
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::with_currencies(["A", "B", "C"])
///     .with_rate("A", "B", dec!(1.5)).unwrap()
///     .with_rate("B", "A", dec!(0.7)).unwrap()
///     .with_rate("B", "C", dec!(1.1)).unwrap();
///
/// let graph = RateGraph::from_table(&table);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.cycle_members(&CurrencyCode::new("A")).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RateGraph {
    graph: DiGraph<CurrencyCode, Decimal>,
    nodes: HashMap<CurrencyCode, NodeIndex>,
    /// Canonical position of each currency, used to keep outputs ordered.
    order: HashMap<CurrencyCode, usize>,
}

impl RateGraph {
    pub fn from_table(table: &RateTable) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut order = HashMap::new();

        for (position, currency) in table.universe().iter().enumerate() {
            let node = graph.add_node(currency.clone());
            nodes.insert(currency.clone(), node);
            order.insert(currency.clone(), position);
        }

        for from in table.universe() {
            for (to, rate) in table.tradable_from(from) {
                graph.add_edge(nodes[from], nodes[to], rate);
            }
        }

        Self {
            graph,
            nodes,
            order,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Currencies that lie on at least one closed route through `home`.
    ///
    /// This is the strongly connected component containing `home`, in
    /// canonical order. A currency outside it can be reached from `home` or
    /// can reach `home`, but not both, so no closed path ever visits it.
    /// Empty when `home` is unknown or on no cycle.
    pub fn cycle_members(&self, home: &CurrencyCode) -> Vec<CurrencyCode> {
        let Some(&home_node) = self.nodes.get(home) else {
            return Vec::new();
        };

        let component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&home_node))
            .unwrap_or_default();
        if component.len() < 2 {
            return Vec::new();
        }

        let mut members: Vec<CurrencyCode> = component
            .into_iter()
            .map(|node| self.graph[node].clone())
            .collect();
        members.sort_by_key(|c| self.order[c]);
        members
    }

    /// Same as [`cycle_members`](Self::cycle_members) as a lookup set.
    pub fn cycle_member_set(&self, home: &CurrencyCode) -> HashSet<CurrencyCode> {
        self.cycle_members(home).into_iter().collect()
    }

    /// Fewest trades of any closed path through `home`, if one exists.
    pub fn min_closing_trades(&self, home: &CurrencyCode) -> Option<usize> {
        let &home_node = self.nodes.get(home)?;
        let hops = dijkstra(&self.graph, home_node, None, |_| 1usize);

        self.graph
            .neighbors_directed(home_node, petgraph::Direction::Incoming)
            .filter_map(|pred| hops.get(&pred).map(|h| h + 1))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn triangle() -> RateTable {
        RateTable::with_currencies(["A", "B", "C"])
            .with_rate("A", "B", dec!(1.5))
            .unwrap()
            .with_rate("B", "C", dec!(1.5))
            .unwrap()
            .with_rate("C", "A", dec!(1.5))
            .unwrap()
    }

    #[test]
    fn test_self_pairs_are_not_edges() {
        let table = RateTable::with_currencies(["A", "B"])
            .with_rate("A", "A", dec!(1))
            .unwrap()
            .with_rate("A", "B", dec!(2))
            .unwrap();
        let graph = RateGraph::from_table(&table);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_triangle_cycle_members() {
        let graph = RateGraph::from_table(&triangle());
        assert_eq!(
            graph.cycle_members(&code("A")),
            vec![code("A"), code("B"), code("C")]
        );
        assert_eq!(graph.min_closing_trades(&code("A")), Some(3));
    }

    #[test]
    fn test_dead_end_currency_is_excluded() {
        let table = triangle().with_rate("A", "D", dec!(10)).unwrap();
        let graph = RateGraph::from_table(&table);
        let members = graph.cycle_member_set(&code("A"));
        assert!(!members.contains(&code("D")));
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn test_no_cycle_through_home() {
        let table = RateTable::with_currencies(["A", "B"])
            .with_rate("A", "B", dec!(2))
            .unwrap();
        let graph = RateGraph::from_table(&table);
        assert!(graph.cycle_members(&code("A")).is_empty());
        assert_eq!(graph.min_closing_trades(&code("A")), None);
    }

    #[test]
    fn test_unknown_home() {
        let graph = RateGraph::from_table(&triangle());
        assert!(graph.cycle_members(&code("Z")).is_empty());
        assert_eq!(graph.min_closing_trades(&code("Z")), None);
    }
}
