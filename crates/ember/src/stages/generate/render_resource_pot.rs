use std::sync::Arc;

use arcstr::ArcStr;
use ember_common::{ModuleGraph, NormalizedCompilerOptions, Resource, ResourcePot, ResourcePotType, ResourceType};
use ember_error::BuildResult;
use ember_plugin::{HookGenerateResourcesArgs, HookRenderResourcePotArgs, RenderedResourcePot};
use ember_sourcemap::{SourceJoiner, SourceMapSource};
use ember_utils::xxhash::{xxhash_base64_url, xxhash_parts};

use super::GenerateStage;

/// Characters of the content hash that go into `[contentHash]`.
const CONTENT_HASH_LEN: usize = 8;

/// Rendered resources of one pot, reused by the next generation when the pot hash is unchanged.
#[derive(Debug, Clone)]
pub struct CachedResourcePot {
  pub hash: String,
  pub resources: Vec<Resource>,
}

pub struct RenderedPot {
  pub hash: String,
  pub resources: Vec<Resource>,
  pub reused: bool,
}

/// Identifies everything that goes into the rendered output of `resource_pot`.
pub fn resource_pot_hash(
  options: &NormalizedCompilerOptions,
  module_graph: &ModuleGraph,
  resource_pot: &ResourcePot,
) -> String {
  let sourcemap = if options.sourcemap { "map" } else { "" };
  let header = [
    resource_pot.id.as_bytes(),
    resource_pot.name.as_bytes(),
    options.filename.template().as_bytes(),
    sourcemap.as_bytes(),
  ];
  let members = resource_pot.modules.iter().flat_map(|id| {
    let content_hash = module_graph.module(id).map_or("", |module| module.content_hash.as_str());
    [id.as_bytes(), content_hash.as_bytes()]
  });
  xxhash_parts(header.into_iter().chain(members))
}

impl GenerateStage<'_> {
  pub async fn render_resource_pot(
    &self,
    module_graph: &ModuleGraph,
    resource_pot: &ResourcePot,
    hash: String,
  ) -> BuildResult<RenderedPot> {
    if let Some(cached) = self.render_cache.and_then(|cache| cache.get(&resource_pot.id)) {
      if cached.hash == hash {
        tracing::debug!(resource_pot = %resource_pot.id, "reusing rendered resources");
        return Ok(RenderedPot { hash, resources: cached.resources.clone(), reused: true });
      }
    }

    let args = HookRenderResourcePotArgs { resource_pot, module_graph };
    let rendered = match self.plugin_driver.render_resource_pot(&args, self.is_hmr).await? {
      Some(rendered) => rendered,
      None => self.render_resource_pot_modules(module_graph, resource_pot),
    };

    let ext = resource_pot.resource_pot_type.ext();
    let content_hash = xxhash_base64_url(rendered.content.as_bytes());
    let short_hash = content_hash.get(..CONTENT_HASH_LEN).unwrap_or(&content_hash);
    let name = self.options.filename.render(&resource_pot.name, Some(short_hash), ext);

    let mut resources = vec![Resource::new(
      name.clone(),
      Arc::<[u8]>::from(rendered.content.as_bytes()),
      ResourceType::from(&resource_pot.resource_pot_type),
      &resource_pot.id,
    )];
    if let Some(source_map) = &rendered.source_map {
      resources.push(Resource::new(
        format!("{name}.map"),
        Arc::<[u8]>::from(source_map.as_bytes()),
        ResourceType::SourceMap,
        &resource_pot.id,
      ));
    }

    self
      .plugin_driver
      .generate_resources(&mut HookGenerateResourcesArgs {
        resource_pot,
        rendered: &rendered,
        resources: &mut resources,
      })
      .await?;

    Ok(RenderedPot { hash, resources, reused: false })
  }

  /// Concatenates the members in pot order. Script and style pots get a banner per module and a
  /// line-level source map.
  fn render_resource_pot_modules(
    &self,
    module_graph: &ModuleGraph,
    resource_pot: &ResourcePot,
  ) -> RenderedResourcePot {
    let with_banner =
      matches!(resource_pot.resource_pot_type, ResourcePotType::Js | ResourcePotType::Css);

    let mut joiner = SourceJoiner::default();
    for id in &resource_pot.modules {
      let Some(module) = module_graph.module(id) else { continue };
      if with_banner {
        joiner.append_source(format!("/* {id} */"));
      }
      joiner.append_source(SourceMapSource::new(module.content.to_string(), id.to_string()));
    }

    let joined = joiner.join_with_source_map(&resource_pot.name, with_banner && self.options.sourcemap);
    RenderedResourcePot {
      content: joined.content.into(),
      source_map: joined.map.map(|map| ArcStr::from(map.to_json_string())),
    }
  }
}
