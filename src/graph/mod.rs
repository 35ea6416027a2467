pub mod rate_graph;
