//! Describes the minimal `Relation` structure and its ordered members.

use super::common::{Interner, TagString, Taggable, Tags};
use crate::error::ExtractError;
use crate::osm::model;
use crate::osm::model::PrimitiveBlock;
use crate::osm::model::relation::MemberType;

#[derive(Clone, Debug)]
pub struct Member {
    pub kind: MemberType,
    pub id: i64,
    pub role: TagString,
}

#[derive(Clone, Debug)]
pub struct Relation {
    id: i64,
    members: Vec<Member>,
    tags: Tags,
}

impl Relation {
    pub fn new(id: i64, members: Vec<Member>, tags: Tags) -> Self {
        Relation { id, members, tags }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_refs_of_kind(&self, kind: MemberType) -> impl Iterator<Item = i64> + '_ {
        self.members
            .iter()
            .filter(move |member| member.kind == kind)
            .map(|member| member.id)
    }

    pub fn member_refs_for_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = i64> + 'a {
        self.members
            .iter()
            .filter(move |member| &*member.role == role)
            .map(|member| member.id)
    }

    #[inline]
    pub(crate) fn from_raw(
        relation: &model::Relation,
        block: &PrimitiveBlock,
        interner: &mut Interner,
    ) -> Result<Self, ExtractError> {
        // Member ids are delta-coded; kinds are a closed enumeration,
        // anything unrecognized fails the decode.
        let mut members = Vec::with_capacity(relation.memids.len());
        let mut previous = 0_i64;
        for ((delta, role_sid), kind) in relation
            .memids
            .iter()
            .zip(relation.roles_sid.iter())
            .zip(relation.types.iter())
        {
            previous += delta;
            let kind =
                MemberType::try_from(*kind).map_err(|_| ExtractError::UnknownMemberKind {
                    relation: relation.id,
                    kind: *kind,
                })?;

            members.push(Member {
                kind,
                id: previous,
                role: TagString::recover(*role_sid as usize, block, interner)?,
            });
        }

        Ok(Relation::new(
            relation.id,
            members,
            relation.tags(block, interner)?,
        ))
    }
}

impl Taggable for model::Relation {
    fn indices(&self) -> impl Iterator<Item = (&u32, &u32)> {
        self.keys.iter().zip(self.vals.iter())
    }
}
