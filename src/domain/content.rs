use std::collections::{HashMap, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::ContentError;
use crate::spatial::Cell;

use super::builtin;
use super::elements::{Category, ElementDef, ElementId, Flammability, PhaseTarget, EL_EMPTY};

/// Concrete reaction for one ordered pair: `a` becomes `out_a`, `b` becomes `out_b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionRule {
    pub out_a: ElementId,
    pub out_b: ElementId,
    /// 0..=100
    pub probability: u8,
}

impl ReactionRule {
    fn mirrored(self) -> Self {
        Self { out_a: self.out_b, out_b: self.out_a, probability: self.probability }
    }
}

/// One side of an authored reaction: a concrete element or every element carrying a tag.
#[derive(Clone, Debug, PartialEq)]
pub enum ReactionSide {
    Element(ElementId),
    Tag(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionSpec {
    pub a: ReactionSide,
    pub b: ReactionSide,
    pub out_a: ElementId,
    pub out_b: ElementId,
    pub probability: u8,
}

/// Read-only element table plus the reaction lookup table.
///
/// Rebuilt wholesale on (re)load and shared behind an `Arc`; never mutated at runtime.
#[derive(Clone, Debug)]
pub struct ElementCatalog {
    elements: Vec<ElementDef>,
    /// `a * len + b` -> rule authored for the ordered pair (a, b)
    reaction_lut: Vec<Option<ReactionRule>>,
    key_to_id: HashMap<String, ElementId>,
}

impl ElementCatalog {
    pub fn builtin() -> Self {
        Self::assemble(builtin::elements(), &builtin::reactions())
    }

    pub fn from_bundle_json(json: &str) -> Result<Self, ContentError> {
        let bundle: BundleRoot = serde_json::from_str(json)?;
        let catalog = Self::from_bundle(bundle)?;
        info!(
            "content bundle loaded: {} elements, {} reaction pairs",
            catalog.element_count(),
            catalog.reaction_lut.iter().filter(|r| r.is_some()).count()
        );
        Ok(catalog)
    }

    /// Expand authored reactions into the pair table. Explicit element pairs always win;
    /// among tag-expanded rules the first one authored for a pair wins.
    fn assemble(elements: Vec<ElementDef>, specs: &[ReactionSpec]) -> Self {
        let n = elements.len();
        let mut reaction_lut = vec![None; n * n];

        let expand = |side: &ReactionSide| -> Vec<ElementId> {
            match side {
                ReactionSide::Element(id) => vec![*id],
                ReactionSide::Tag(tag) => elements
                    .iter()
                    .enumerate()
                    .filter(|(_, def)| def.has_tag(tag))
                    .map(|(id, _)| id as ElementId)
                    .collect(),
            }
        };

        let explicit = |s: &&ReactionSpec| {
            matches!((&s.a, &s.b), (ReactionSide::Element(_), ReactionSide::Element(_)))
        };

        for spec in specs.iter().filter(explicit) {
            for a in expand(&spec.a) {
                for b in expand(&spec.b) {
                    reaction_lut[a as usize * n + b as usize] = Some(ReactionRule {
                        out_a: spec.out_a,
                        out_b: spec.out_b,
                        probability: spec.probability,
                    });
                }
            }
        }

        for spec in specs.iter().filter(|s| !explicit(s)) {
            for a in expand(&spec.a) {
                for b in expand(&spec.b) {
                    let slot = &mut reaction_lut[a as usize * n + b as usize];
                    if slot.is_none() {
                        *slot = Some(ReactionRule {
                            out_a: spec.out_a,
                            out_b: spec.out_b,
                            probability: spec.probability,
                        });
                    }
                }
            }
        }

        let key_to_id = elements
            .iter()
            .enumerate()
            .map(|(id, def)| (def.key.clone(), id as ElementId))
            .collect();

        Self { elements, reaction_lut, key_to_id }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_valid_element_id(&self, id: ElementId) -> bool {
        (id as usize) < self.elements.len()
    }

    /// Definition for `id`. Unknown ids resolve to the empty/air definition.
    #[inline]
    pub fn get(&self, id: ElementId) -> &ElementDef {
        match self.elements.get(id as usize) {
            Some(def) => def,
            None => &self.elements[EL_EMPTY as usize],
        }
    }

    #[inline]
    pub fn category(&self, id: ElementId) -> Category {
        self.get(id).category
    }

    /// Unknown ids collapse to empty, which never collides.
    #[inline]
    pub fn is_collidable(&self, id: ElementId) -> bool {
        id != EL_EMPTY && self.is_valid_element_id(id) && self.category(id).is_collidable()
    }

    pub fn id_by_key(&self, key: &str) -> Option<ElementId> {
        self.key_to_id.get(key).copied()
    }

    /// Rule for `self_type` reacting with `other`. Checks the ordered pair first, then the
    /// mirrored pair with its outputs swapped, so either cell of a pair can trigger it.
    pub fn reaction(&self, self_type: ElementId, other: ElementId) -> Option<ReactionRule> {
        let n = self.elements.len();
        let (a, b) = (self_type as usize, other as usize);
        if a >= n || b >= n {
            return None;
        }
        if let Some(rule) = self.reaction_lut[a * n + b] {
            return Some(rule);
        }
        self.reaction_lut[b * n + a].map(ReactionRule::mirrored)
    }

    pub fn color_with_variation(&self, id: ElementId, seed: u8) -> u32 {
        let base = self.get(id).color;
        if id == EL_EMPTY {
            return base;
        }
        let variation = ((seed & 31) as i32 - 16) * 2;

        let a = (base >> 24) & 0xFF;
        let b = (((base >> 16) & 0xFF) as i32 + variation).clamp(0, 255) as u32;
        let g = (((base >> 8) & 0xFF) as i32 + variation).clamp(0, 255) as u32;
        let r = ((base & 0xFF) as i32 + variation).clamp(0, 255) as u32;

        (a << 24) | (b << 16) | (g << 8) | r
    }

    /// Fresh grid-owned cell of type `id` with the type's default state.
    pub fn make_cell(&self, id: ElementId, color_seed: u8, updated: bool) -> Cell {
        let id = if self.is_valid_element_id(id) { id } else { EL_EMPTY };
        let def = self.get(id);
        let color = self.color_with_variation(id, color_seed);
        Cell {
            element: id,
            color,
            base_color: color,
            temperature: def.default_temp,
            health: def.health,
            ignited: false,
            sliding: def.category == Category::MovableSolid,
            bias: 0,
            updated,
            owner: Default::default(),
        }
    }

    pub fn manifest_json(&self) -> String {
        let out = ContentManifest {
            format_version: 1,
            elements: self
                .elements
                .iter()
                .enumerate()
                .map(|(id, def)| ContentManifestElement {
                    id: id as ElementId,
                    key: &def.key,
                    category: def.category,
                    color: def.color,
                    hidden: id == EL_EMPTY as usize,
                })
                .collect(),
        };
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    }

    fn from_bundle(bundle: BundleRoot) -> Result<Self, ContentError> {
        if bundle.elements.is_empty() {
            return Err(ContentError::Empty);
        }
        if bundle.elements.len() > (ElementId::MAX as usize) + 1 {
            return Err(ContentError::TooManyElements(bundle.elements.len()));
        }

        let mut key_to_id: HashMap<String, ElementId> = HashMap::new();
        for (id, el) in bundle.elements.iter().enumerate() {
            if key_to_id.insert(el.key.clone(), id as ElementId).is_some() {
                return Err(ContentError::DuplicateKey(el.key.clone()));
            }
        }

        let resolve = |key: &str, context: &dyn Fn() -> String| -> Result<ElementId, ContentError> {
            key_to_id.get(key).copied().ok_or_else(|| ContentError::UnknownElement {
                key: key.to_string(),
                context: context(),
            })
        };

        let mut elements = Vec::with_capacity(bundle.elements.len());
        for el in bundle.elements.iter() {
            let context = || format!("element `{}`", el.key);
            let flammability = match &el.flammable {
                None => None,
                Some(f) => Some(Flammability {
                    ignition_temp: f.ignition_temp,
                    fire_temp: f.fire_temp,
                    burn_rate: f.burn_rate,
                    spread_chance: percent(&el.key, "spreadChance", f.spread_chance)?,
                    burnt_into: resolve(&f.burnt_into, &context)?,
                }),
            };
            let phase = |p: &Option<BundlePhase>| -> Result<Option<PhaseTarget>, ContentError> {
                match p {
                    None => Ok(None),
                    Some(p) => Ok(Some(PhaseTarget {
                        threshold: p.temp,
                        into: resolve(&p.into, &context)?,
                    })),
                }
            };

            elements.push(ElementDef {
                key: el.key.clone(),
                category: el.category,
                color: el.color,
                density: el.density,
                friction: percent(&el.key, "friction", el.friction)?,
                conductivity: percent(&el.key, "conductivity", el.conductivity)?,
                default_temp: el.default_temp,
                health: el.health,
                dispersion: el.dispersion,
                flammability,
                melt: phase(&el.melt)?,
                freeze: phase(&el.freeze)?,
                tags: el.tags.clone(),
            });
        }

        let mut specs = Vec::with_capacity(bundle.reactions.len());
        let mut explicit_pairs: HashSet<(ElementId, ElementId)> = HashSet::new();
        for r in bundle.reactions.iter() {
            let context = || format!("reaction ({}, {})", r.a, r.b);
            let side = |name: &str| -> Result<ReactionSide, ContentError> {
                match name.strip_prefix('#') {
                    Some(tag) => {
                        if elements.iter().any(|def| def.has_tag(tag)) {
                            Ok(ReactionSide::Tag(tag.to_string()))
                        } else {
                            Err(ContentError::UnknownTag { tag: tag.to_string(), context: context() })
                        }
                    }
                    None => resolve(name, &context).map(ReactionSide::Element),
                }
            };

            let a = side(&r.a)?;
            let b = side(&r.b)?;
            if let (ReactionSide::Element(ea), ReactionSide::Element(eb)) = (&a, &b) {
                if !explicit_pairs.insert((*ea, *eb)) {
                    return Err(ContentError::DuplicateReaction { a: r.a.clone(), b: r.b.clone() });
                }
            }

            specs.push(ReactionSpec {
                a,
                b,
                out_a: resolve(&r.out_a, &context)?,
                out_b: resolve(&r.out_b, &context)?,
                probability: percent(&context(), "probability", r.probability)?,
            });
        }

        Ok(Self::assemble(elements, &specs))
    }
}

fn percent(key: &str, field: &'static str, value: i64) -> Result<u8, ContentError> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ContentError::OutOfRange { key: key.to_string(), field, value })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentManifest<'a> {
    format_version: u32,
    elements: Vec<ContentManifestElement<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentManifestElement<'a> {
    id: ElementId,
    key: &'a str,
    category: Category,
    color: u32,
    hidden: bool,
}

fn default_temp() -> f32 {
    20.0
}

fn default_health() -> i32 {
    100
}

fn default_friction() -> i64 {
    100
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRoot {
    #[serde(default)]
    #[allow(dead_code)]
    format_version: u32,
    elements: Vec<BundleElement>,
    #[serde(default)]
    reactions: Vec<BundleReaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleElement {
    key: String,
    category: Category,
    color: u32,
    #[serde(default)]
    density: f32,
    #[serde(default = "default_friction")]
    friction: i64,
    #[serde(default)]
    conductivity: i64,
    #[serde(default = "default_temp")]
    default_temp: f32,
    #[serde(default = "default_health")]
    health: i32,
    #[serde(default)]
    dispersion: u8,
    #[serde(default)]
    flammable: Option<BundleFlammability>,
    #[serde(default)]
    melt: Option<BundlePhase>,
    #[serde(default)]
    freeze: Option<BundlePhase>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleFlammability {
    ignition_temp: f32,
    fire_temp: f32,
    burn_rate: i32,
    spread_chance: i64,
    burnt_into: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundlePhase {
    temp: f32,
    into: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleReaction {
    a: String,
    b: String,
    out_a: String,
    out_b: String,
    probability: i64,
}
