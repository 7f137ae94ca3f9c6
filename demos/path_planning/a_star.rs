//! A* Graph Search Example
//!
//! Builds a small road map with a detour and searches it with A* and Dijkstra.

use rust_motion_planning::path_planning::{a_star, dijkstra, Graph};

fn main() {
    println!("A* graph search start!!");

    // Nodes on a 10 x 10 square, the direct edge 1 -> 4 is expensive
    let positions = [
        (1, 0.0, 0.0),
        (2, 5.0, 0.0),
        (3, 10.0, 5.0),
        (4, 10.0, 10.0),
        (5, 0.0, 10.0),
    ];
    let edges = [
        (1, 2, 5.0),
        (2, 3, 7.1),
        (3, 4, 5.0),
        (1, 5, 10.0),
        (5, 4, 10.0),
        (1, 4, 30.0),
    ];

    let mut graph = Graph::new();
    for (id, x, y) in positions {
        if let Err(e) = graph.add_node(id, x, y) {
            eprintln!("Invalid node: {}", e);
            return;
        }
    }
    for (tail, head, weight) in edges {
        if let Err(e) = graph.add_edge(tail, head, weight) {
            eprintln!("Invalid edge: {}", e);
            return;
        }
    }
    println!("Created graph with {} nodes", graph.len());

    match a_star(&graph, 1, 4) {
        Ok(result) => {
            println!("A* path: {:?}", result.path_ids());
            println!("Cost: {:.2}, {} nodes expanded", result.path_cost, result.search_tree.len());
        }
        Err(failure) => println!("A* failed: {}", failure),
    }

    match dijkstra(&graph, 1, 4) {
        Ok(result) => {
            println!("Dijkstra path: {:?}", result.path_ids());
            println!("Cost: {:.2}, {} nodes expanded", result.path_cost, result.search_tree.len());
        }
        Err(failure) => println!("Dijkstra failed: {}", failure),
    }

    println!("A* graph search finish!!");
}
