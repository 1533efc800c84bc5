use std::collections::BTreeMap;

use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::pack::Bits;
use crate::util::{self, FrequencyTable};

/// mapping from symbol to its bit code
pub type CodeTable<S> = BTreeMap<S, Bits>;

/// represents the Huffman coding for symbols
#[derive(Debug, Clone)]
pub struct Tree<S: Ord>(Node<S>);

impl<S> Tree<S>
where
    S: Ord + Clone,
{
    /// creates Huffman tree from symbols and their occurrences
    /// returns None at empty input
    pub fn new(occurrences: &FrequencyTable<S>) -> Option<Self> {
        // ties in weight keep the ascending symbol order of the table
        let mut nodes = occurrences
            .iter()
            .map(|(symbol, &weight)| Node::Leaf {
                symbol: symbol.clone(),
                weight,
            })
            .collect::<Vec<Node<S>>>();
        nodes.sort_by(|node0, node1| Ord::cmp(&node1.weight(), &node0.weight()));

        // the lightest nodes sit at the back
        while nodes.len() > 1 {
            let (lighter, heavier) = match (nodes.pop(), nodes.pop()) {
                (Some(lighter), Some(heavier)) => (lighter, heavier),
                _ => break,
            };
            insert_sorted(&mut nodes, Node::merge(lighter, heavier));
        }
        let root = nodes.pop()?;
        log::trace!(
            "built tree of weight {} over {} symbols",
            root.weight(),
            root.label().len()
        );
        Some(Tree(root))
    }

    /// count occurrence of each symbol in given sequence and construct Huffman tree
    pub fn from_sequence<I>(sequence: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
    {
        Self::new(&util::count_occurrences(sequence))
    }

    pub fn root(&self) -> &Node<S> {
        &self.0
    }

    /// assign '0' to each left branch and '1' to each right branch
    /// a lone leaf is given the code "0"
    pub fn code_table(&self) -> CodeTable<S> {
        fn recur<S: Ord + Clone>(node: &Node<S>, code: &mut Bits, table: &mut CodeTable<S>) {
            match node {
                Node::Leaf { symbol, .. } => {
                    table.insert(symbol.clone(), code.clone());
                }
                Node::Merged { left, right, .. } => {
                    code.push(false);
                    recur(left, code, table);
                    code.pop();
                    code.push(true);
                    recur(right, code, table);
                    code.pop();
                }
            }
        }
        let Tree(root) = self;
        let mut table = CodeTable::new();
        let mut code = Bits::new();
        if root.is_leaf() {
            code.push(false);
        }
        recur(root, &mut code, &mut table);
        table
    }

    /// decode by walking the tree from the root, restarting at every leaf
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<S>> {
        self.walk(bits.iter().by_vals().map(Ok))
    }

    /// decode a string of '0' and '1' characters
    pub fn decode_str(&self, code: &str) -> Result<Vec<S>> {
        self.walk(code.chars().enumerate().map(|(position, found)| match found {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(Error::InvalidBit { position, found }),
        }))
    }

    fn walk<I>(&self, bits: I) -> Result<Vec<S>>
    where
        I: Iterator<Item = Result<bool>>,
    {
        let Tree(root) = self;
        let mut decoded = Vec::new();
        let mut current = root;
        let mut code_start = 0;
        for (position, bit) in bits.enumerate() {
            let bit = bit?;
            current = match current {
                Node::Merged { left, right, .. } => {
                    if bit {
                        &**right
                    } else {
                        &**left
                    }
                }
                // a lone leaf only answers to "0"
                Node::Leaf { .. } if !bit => current,
                Node::Leaf { .. } => return Err(Error::UnassignedCode { position }),
            };
            if let Node::Leaf { symbol, .. } = current {
                decoded.push(symbol.clone());
                current = root;
                code_start = position + 1;
            }
        }
        if !std::ptr::eq(current, root) {
            return Err(Error::IncompleteCode {
                position: code_start,
            });
        }
        Ok(decoded)
    }
}

/// node of the code tree
/// a node is a leaf exactly when it has no children
#[derive(Debug, Clone)]
pub enum Node<S> {
    Leaf {
        symbol: S,
        weight: usize,
    },
    Merged {
        /// symbols covered by this subtree, used only for identity
        label: Vec<S>,
        weight: usize,
        left: Box<Node<S>>,
        right: Box<Node<S>>,
    },
}

impl<S> Node<S>
where
    S: Clone,
{
    /// combine two subtrees, the first one becomes the left child
    fn merge(left: Self, right: Self) -> Self {
        let mut label = left.label().to_vec();
        label.extend_from_slice(right.label());
        Node::Merged {
            label,
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl<S> Node<S> {
    /// summed occurrences of all symbols under this node
    pub fn weight(&self) -> usize {
        match *self {
            Node::Leaf { weight, .. } | Node::Merged { weight, .. } => weight,
        }
    }

    pub fn label(&self) -> &[S] {
        match self {
            Node::Leaf { symbol, .. } => std::slice::from_ref(symbol),
            Node::Merged { label, .. } => label,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// nodes are equal when weight and covered symbols are, whatever their shape
impl<S: PartialEq> PartialEq for Node<S> {
    fn eq(&self, other: &Self) -> bool {
        self.weight() == other.weight() && self.label() == other.label()
    }
}

/// insert before the first strictly lighter node, keeping descending order
fn insert_sorted<S>(nodes: &mut Vec<Node<S>>, node: Node<S>) {
    let index = nodes
        .iter()
        .position(|existing| existing.weight() < node.weight())
        .unwrap_or_else(|| nodes.len());
    nodes.insert(index, node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{parse_bits, to_bit_string};

    fn leaves(pairs: &[(char, usize)]) -> Vec<Node<char>> {
        pairs
            .iter()
            .map(|&(symbol, weight)| Node::Leaf { symbol, weight })
            .collect()
    }

    fn codes(tree: &Tree<char>) -> BTreeMap<char, String> {
        tree.code_table()
            .iter()
            .map(|(symbol, code)| (*symbol, to_bit_string(code)))
            .collect()
    }

    #[test]
    fn insert_sorted_in_the_middle() {
        let mut nodes = leaves(&[('a', 20), ('b', 16), ('c', 12), ('d', 8)]);
        insert_sorted(&mut nodes, Node::Leaf { symbol: 'x', weight: 13 });
        assert_eq!(
            nodes,
            leaves(&[('a', 20), ('b', 16), ('x', 13), ('c', 12), ('d', 8)])
        );
    }

    #[test]
    fn insert_sorted_at_the_end() {
        let mut nodes = leaves(&[('a', 12), ('b', 9), ('c', 6), ('d', 3)]);
        insert_sorted(&mut nodes, Node::Leaf { symbol: 'x', weight: 0 });
        assert_eq!(
            nodes,
            leaves(&[('a', 12), ('b', 9), ('c', 6), ('d', 3), ('x', 0)])
        );
    }

    #[test]
    fn insert_sorted_goes_before_equal_weights() {
        let mut nodes = leaves(&[('a', 8), ('b', 4), ('c', 4), ('d', 2)]);
        insert_sorted(&mut nodes, Node::Leaf { symbol: 'x', weight: 4 });
        assert_eq!(
            nodes,
            leaves(&[('a', 8), ('x', 4), ('b', 4), ('c', 4), ('d', 2)])
        );
    }

    #[test]
    fn equality_ignores_children() {
        let one = Node::merge(
            Node::Leaf { symbol: 'a', weight: 1 },
            Node::Leaf { symbol: 'b', weight: 2 },
        );
        let other = Node::Merged {
            label: vec!['a', 'b'],
            weight: 3,
            left: Box::new(Node::Leaf { symbol: 'b', weight: 3 }),
            right: Box::new(Node::Leaf { symbol: 'z', weight: 0 }),
        };
        assert_eq!(one, other);
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(Tree::<char>::from_sequence("".chars()).is_none());
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let tree = Tree::from_sequence("aaaa".chars()).unwrap();
        assert!(tree.root().is_leaf());
        let expected: BTreeMap<char, String> = vec![('a', "0".to_string())].into_iter().collect();
        assert_eq!(codes(&tree), expected);
        assert_eq!(tree.decode_str("0000").unwrap(), vec!['a'; 4]);
    }

    #[test]
    fn two_symbols_tie_break() {
        let tree = Tree::from_sequence("ab".chars()).unwrap();
        assert_eq!(
            codes(&tree),
            vec![('a', "1".to_string()), ('b', "0".to_string())]
                .into_iter()
                .collect::<BTreeMap<_, _>>()
        );
        let text = "abbabaabbbbab";
        let code_table = tree.code_table();
        let encoded = crate::stream::encode(&code_table, text.chars()).unwrap();
        let decoded: String = tree.decode(&encoded).unwrap().into_iter().collect();
        assert_eq!(decoded, text);
    }

    #[test]
    fn root_weight_is_input_length() {
        let text = "the thrilling thrift";
        let tree = Tree::from_sequence(text.chars()).unwrap();
        assert_eq!(tree.root().weight(), text.len());
        let mut label = tree.root().label().to_vec();
        label.sort_unstable();
        label.dedup();
        assert_eq!(label.len(), 10);
    }

    #[test]
    fn codes_are_prefix_free() {
        for text in [
            "the thrilling thrift",
            "aaaabbbccd",
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
            "abcdefghijklmnopqrstuvwxyz",
        ] {
            let table = Tree::from_sequence(text.chars()).unwrap().code_table();
            for (symbol0, code0) in &table {
                for (symbol1, code1) in &table {
                    if symbol0 != symbol1 {
                        assert!(
                            !code1.starts_with(code0.as_bitslice()),
                            "{} prefixes {}",
                            symbol0,
                            symbol1
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn heavier_symbols_get_shorter_codes() {
        let tree = Tree::from_sequence("aaaaaaaabbbbccd".chars()).unwrap();
        let table = tree.code_table();
        assert_eq!(table[&'a'].len(), 1);
        assert_eq!(table[&'b'].len(), 2);
        assert_eq!(table[&'c'].len(), 3);
        assert_eq!(table[&'d'].len(), 3);
    }

    #[test]
    fn tree_walk_rejects_non_binary() {
        let tree = Tree::from_sequence("abc".chars()).unwrap();
        match tree.decode_str("01x") {
            Err(Error::InvalidBit { position: 2, found: 'x' }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn tree_walk_reports_trailing_bits() {
        let tree = Tree::from_sequence("aaaabbc".chars()).unwrap();
        // 'a' is "1", 'b' and 'c' share the prefix "0"
        let bits = parse_bits("110").unwrap();
        match tree.decode(&bits) {
            Err(Error::IncompleteCode { position: 2 }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
