//! The `Element` item, provides distinction for
//! Nodes, DenseNodes, Ways and Relations by reference to their
//! derived item in the primitive group.

use crate::error::ExtractError;
use crate::osm::element::iterator::DecodeKinds;
use crate::osm::element::variants::common::Interner;
use crate::osm::element::variants::{Node, Relation, Way};
use crate::osm::model;

#[derive(Clone)]
pub enum Element<'a> {
    Node(&'a model::Node),
    Way(&'a model::Way),
    DenseNodes(&'a model::DenseNodes),
    Relation(&'a model::Relation),
}

#[derive(Clone, Debug)]
pub enum ProcessedElement {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl ProcessedElement {
    #[inline]
    pub(crate) fn from_raw(
        element: Element,
        block: &model::PrimitiveBlock,
        interner: &mut Interner,
    ) -> Result<Vec<ProcessedElement>, ExtractError> {
        match element {
            Element::DenseNodes(dense) => Ok(Node::from_dense(dense, block, interner)?
                .into_iter()
                .map(ProcessedElement::Node)
                .collect()),
            Element::Node(node) => Ok(vec![ProcessedElement::Node(Node::from_raw(
                node, block, interner,
            )?)]),
            Element::Way(way) => Ok(vec![ProcessedElement::Way(Way::from_raw(
                way, block, interner,
            )?)]),
            Element::Relation(relation) => Ok(vec![ProcessedElement::Relation(
                Relation::from_raw(relation, block, interner)?,
            )]),
        }
    }

    pub fn str_type(&self) -> &str {
        match self {
            ProcessedElement::Node(_) => "node",
            ProcessedElement::Way(_) => "way",
            ProcessedElement::Relation(_) => "relation",
        }
    }
}

impl<'a> Element<'a> {
    /// Collects the group's elements, restricted to the enabled kinds.
    /// Disabled kinds are skipped before any delta decoding happens.
    #[inline]
    pub(crate) fn from_group(
        group: &'a model::PrimitiveGroup,
        kinds: DecodeKinds,
    ) -> Vec<Element<'a>> {
        let mut elements: Vec<Element<'a>> = Vec::new();

        if kinds.contains(DecodeKinds::WAYS) {
            elements.extend(group.ways.iter().map(Element::Way));
        }

        if kinds.contains(DecodeKinds::NODES) {
            elements.extend(group.nodes.iter().map(Element::Node));

            if let Some(nodes) = &group.dense {
                elements.push(Element::DenseNodes(nodes));
            }
        }

        if kinds.contains(DecodeKinds::RELATIONS) {
            elements.extend(group.relations.iter().map(Element::Relation));
        }

        elements
    }

    pub fn str_type(&self) -> &str {
        match self {
            Element::Node(_) => "node",
            Element::Way(_) => "way",
            Element::Relation(_) => "relation",
            Element::DenseNodes(_) => "node set",
        }
    }
}
